//! Fixtures: shapes attached to bodies

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strata_math::Aabb;

use crate::broadphase::ProxyId;
use crate::ids::{FixtureId, GridId};
use crate::layers::CollisionLayer;
use crate::shape::PhysShape;

/// One broadphase registration of a fixture on one grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureProxy {
    /// Bounds in the grid's local space at registration time
    pub aabb: Aabb,
    /// Which child of the fixture's shape this covers
    pub child_index: usize,
    /// Id within the grid's broadphase
    pub proxy_id: ProxyId,
}

/// A collision shape attached to a body
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    /// Id unique within the owning body
    pub id: FixtureId,
    /// The collision shape, in body-local space
    pub shape: PhysShape,
    /// What this fixture is, for filtering
    pub collision_layer: CollisionLayer,
    /// What this fixture collides with
    pub collision_mask: CollisionLayer,
    /// Hard fixtures block movement; soft ones only report overlap
    pub hard: bool,
    /// Surface friction coefficient
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
    /// Live broadphase registrations, keyed by grid
    pub(crate) proxies: HashMap<GridId, Vec<FixtureProxy>>,
}

impl Fixture {
    /// Create a fixture around a shape. The id is assigned when the fixture
    /// is attached to a body.
    pub fn new(shape: PhysShape) -> Self {
        Self {
            id: FixtureId(0),
            shape,
            collision_layer: CollisionLayer::NONE,
            collision_mask: CollisionLayer::NONE,
            hard: true,
            friction: 0.4,
            restitution: 0.0,
            proxies: HashMap::new(),
        }
    }

    /// Set the collision layer
    pub fn with_collision_layer(mut self, layer: CollisionLayer) -> Self {
        self.collision_layer = layer;
        self
    }

    /// Set the collision mask
    pub fn with_collision_mask(mut self, mask: CollisionLayer) -> Self {
        self.collision_mask = mask;
        self
    }

    /// Set hardness
    pub fn with_hard(mut self, hard: bool) -> Self {
        self.hard = hard;
        self
    }

    /// Set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Total live proxies across all grids
    pub fn proxy_count(&self) -> usize {
        self.proxies.values().map(Vec::len).sum()
    }

    /// Grids this fixture currently has proxies on
    pub fn registered_grids(&self) -> impl Iterator<Item = GridId> + '_ {
        self.proxies.keys().copied()
    }

    /// Proxies on one grid
    pub fn proxies_on(&self, grid: GridId) -> &[FixtureProxy] {
        self.proxies.get(&grid).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The replicated portion of a fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureState {
    pub id: FixtureId,
    pub shape: PhysShape,
    pub collision_layer: CollisionLayer,
    pub collision_mask: CollisionLayer,
    pub hard: bool,
    pub friction: f32,
    pub restitution: f32,
}

impl FixtureState {
    /// Capture the replicated fields of a fixture
    pub fn capture(fixture: &Fixture) -> Self {
        Self {
            id: fixture.id,
            shape: fixture.shape.clone(),
            collision_layer: fixture.collision_layer,
            collision_mask: fixture.collision_mask,
            hard: fixture.hard,
            friction: fixture.friction,
            restitution: fixture.restitution,
        }
    }

    /// Rebuild a fixture from replicated state. Proxies start empty; the
    /// world recreates them on the next synchronize.
    pub fn restore(self) -> Fixture {
        Fixture {
            id: self.id,
            shape: self.shape,
            collision_layer: self.collision_layer,
            collision_mask: self.collision_mask,
            hard: self.hard,
            friction: self.friction,
            restitution: self.restitution,
            proxies: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadphase::ProxyId;

    #[test]
    fn test_proxy_count_spans_grids() {
        let mut fixture = Fixture::new(PhysShape::unit_box());
        assert_eq!(fixture.proxy_count(), 0);

        let proxy = FixtureProxy {
            aabb: Aabb::EMPTY,
            child_index: 0,
            proxy_id: ProxyId(0),
        };
        fixture.proxies.insert(GridId(1), vec![proxy]);
        fixture.proxies.insert(GridId(2), vec![proxy, proxy]);
        assert_eq!(fixture.proxy_count(), 3);
        assert_eq!(fixture.proxies_on(GridId(2)).len(), 2);
        assert_eq!(fixture.proxies_on(GridId(9)).len(), 0);
    }

    #[test]
    fn test_state_round_trip_drops_proxies() {
        let mut fixture = Fixture::new(PhysShape::circle(0.35))
            .with_collision_layer(CollisionLayer::MOB)
            .with_collision_mask(CollisionLayer::STRUCTURE)
            .with_hard(false);
        fixture.proxies.insert(
            GridId(1),
            vec![FixtureProxy {
                aabb: Aabb::EMPTY,
                child_index: 0,
                proxy_id: ProxyId(3),
            }],
        );

        let restored = FixtureState::capture(&fixture).restore();
        assert_eq!(restored.shape, fixture.shape);
        assert_eq!(restored.collision_layer, CollisionLayer::MOB);
        assert!(!restored.hard);
        assert_eq!(restored.proxy_count(), 0);
    }
}
