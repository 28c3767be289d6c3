//! Ray cast queries against the broadphase
//!
//! A ray is cast per map: it is offset into the local frame of every grid
//! whose broadphase it crosses, and the resulting hits are mapped back to
//! world space before being merged and sorted by distance.

use strata_math::Vec2;

use crate::ids::{EntityUid, FixtureId};
use crate::layers::CollisionLayer;

/// One broadphase hit from a ray cast, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastHit {
    /// Entity owning the hit fixture
    pub entity: EntityUid,
    /// The fixture whose proxy the ray entered
    pub fixture: FixtureId,
    /// World-space point where the ray enters the proxy bounds
    pub point: Vec2,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

/// Options for a ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastOptions {
    /// Maximum distance the ray travels
    pub max_distance: f32,
    /// Only fixtures whose collision layer overlaps this mask are hit
    pub mask: CollisionLayer,
    /// Entity the ray ignores, usually the caster
    pub exclude: Option<EntityUid>,
}

impl Default for RayCastOptions {
    fn default() -> Self {
        Self {
            max_distance: 50.0,
            mask: CollisionLayer::ALL,
            exclude: None,
        }
    }
}

impl RayCastOptions {
    /// Set the maximum ray distance
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the collision mask
    pub fn with_mask(mut self, mask: CollisionLayer) -> Self {
        self.mask = mask;
        self
    }

    /// Ignore hits on `entity`
    pub fn exclude(mut self, entity: EntityUid) -> Self {
        self.exclude = Some(entity);
        self
    }
}
