//! Replication snapshot for physics bodies
//!
//! Mass travels in grams on the wire and is stored in kilograms
//! internally. Fixtures are replaced wholesale on apply; incremental
//! fixture diffing is deliberately not attempted.

use serde::{Deserialize, Serialize};
use strata_math::Vec2;

use crate::body::{Body, BodyStatus};
use crate::error::Result;
use crate::fixture::FixtureState;

/// The authoritative replicated state of one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsState {
    pub can_collide: bool,
    pub status: BodyStatus,
    pub hard: bool,
    /// Mass in grams
    pub mass: f32,
    pub fixtures: Vec<FixtureState>,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub anchored: bool,
}

impl PhysicsState {
    /// Capture a snapshot from a body
    pub fn capture(body: &Body) -> Self {
        Self {
            can_collide: body.can_collide(),
            status: body.status(),
            hard: body.hard(),
            mass: body.mass() * 1000.0,
            fixtures: body.fixtures().iter().map(FixtureState::capture).collect(),
            linear_velocity: body.linear_velocity(),
            angular_velocity: body.angular_velocity(),
            anchored: body.anchored(),
        }
    }

    /// Write this snapshot into a body.
    ///
    /// Anchoring is applied first so that the mass write lands on the
    /// correct body type; every fixture shape is re-validated before any
    /// of the body is touched. Clears the prediction flag.
    pub fn apply(&self, body: &mut Body) -> Result<()> {
        for fixture in &self.fixtures {
            fixture.shape.apply_state()?;
        }

        body.set_anchored(self.anchored);
        body.set_can_collide(self.can_collide);
        body.set_status(self.status);
        body.replace_fixtures(self.fixtures.iter().cloned().map(FixtureState::restore).collect());
        body.set_mass(self.mass / 1000.0);
        body.set_linear_velocity(self.linear_velocity);
        body.set_angular_velocity(self.angular_velocity);
        body.set_predict(false);
        body.dirty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::fixture::Fixture;
    use crate::ids::EntityUid;
    use crate::layers::CollisionLayer;
    use crate::shape::PhysShape;
    use approx::assert_relative_eq;

    fn sample_body() -> Body {
        let mut body = Body::dynamic(EntityUid(1)).with_mass(2.0);
        body.add_fixture(
            Fixture::new(PhysShape::circle(0.35))
                .with_collision_layer(CollisionLayer::MOB)
                .with_collision_mask(CollisionLayer::STRUCTURE),
        );
        body.set_linear_velocity(Vec2::new(1.0, -0.5));
        body
    }

    #[test]
    fn test_mass_is_grams_on_the_wire() {
        let state = sample_body().get_state();
        assert_relative_eq!(state.mass, 2000.0);

        let mut target = Body::dynamic(EntityUid(2));
        state.apply(&mut target).unwrap();
        assert_relative_eq!(target.mass(), 2.0);
    }

    #[test]
    fn test_apply_replaces_fixtures_and_clears_predict() {
        let state = sample_body().get_state();

        let mut target = Body::dynamic(EntityUid(2));
        target.add_fixture(Fixture::new(PhysShape::unit_box()));
        target.add_fixture(Fixture::new(PhysShape::unit_box()));
        target.set_predict(true);

        state.apply(&mut target).unwrap();
        assert_eq!(target.fixtures().len(), 1);
        assert_eq!(target.collision_layer(), CollisionLayer::MOB);
        assert!(!target.predict());
        assert_eq!(target.linear_velocity(), Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_apply_rejects_invalid_shapes_untouched() {
        let mut state = sample_body().get_state();
        state.fixtures[0].shape = PhysShape::circle(-1.0);

        let mut target = Body::dynamic(EntityUid(2));
        target.set_mass(5.0);
        assert!(state.apply(&mut target).is_err());
        assert_relative_eq!(target.mass(), 5.0);
    }

    #[test]
    fn test_anchored_applies_before_mass() {
        let mut source = sample_body();
        source.set_anchored(true);
        let state = source.get_state();

        // A previously-anchored target being released must accept the mass.
        let mut released = sample_body().get_state();
        released.anchored = false;
        released.mass = 7000.0;
        let mut target = Body::fixed(EntityUid(3));
        released.apply(&mut target).unwrap();
        assert_relative_eq!(target.mass(), 7.0);

        // And anchoring wins over motion.
        let mut target = Body::dynamic(EntityUid(4));
        state.apply(&mut target).unwrap();
        assert!(target.anchored());
        assert_eq!(target.linear_velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_json_field_order_is_stable() {
        let state = sample_body().get_state();
        let json = serde_json::to_string(&state).unwrap();
        let can_collide = json.find("can_collide").unwrap();
        let mass = json.find("mass").unwrap();
        let anchored = json.find("anchored").unwrap();
        assert!(can_collide < mass && mass < anchored);

        let back: PhysicsState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
