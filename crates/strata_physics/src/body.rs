//! Rigid body state and mutation rules
//!
//! A [`Body`] owns its fixtures and controllers outright. Mutators enforce
//! the body-type gating rules (Static bodies ignore motion writes, only
//! Dynamic bodies carry mass) and record [`PhysicsEvent`]s for the
//! simulation loop to dispatch.

use serde::{Deserialize, Serialize};
use strata_math::{close_to, Aabb, Transform2, Vec2};

use crate::controller::{Controller, ControllerKind, ControllerSet, ControllerState};
use crate::error::{PhysicsError, Result};
use crate::events::PhysicsEvent;
use crate::fixture::Fixture;
use crate::ids::{EntityUid, FixtureId};
use crate::layers::CollisionLayer;
use crate::state::PhysicsState;

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves; anchored to its grid
    #[default]
    Static,
    /// Moved by velocity writes only, never by forces
    Kinematic,
    /// Fully simulated
    Dynamic,
}

/// Replicated movement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyStatus {
    #[default]
    OnGround,
    InAir,
}

/// A rigid body
#[derive(Debug)]
pub struct Body {
    /// The entity this body belongs to
    pub owner: EntityUid,

    body_type: BodyType,
    status: BodyStatus,

    mass: f32,
    inv_mass: f32,
    inertia: f32,
    inv_inertia: f32,

    linear_velocity: Vec2,
    angular_velocity: f32,

    /// Force accumulator, cleared after integration
    pub force: Vec2,
    /// Torque accumulator, cleared after integration
    pub torque: f32,

    /// Linear velocity attenuation per second
    pub linear_damping: f32,
    /// Angular velocity attenuation per second
    pub angular_damping: f32,

    fixed_rotation: bool,
    can_collide: bool,
    sleeping_allowed: bool,
    awake: bool,
    predict: bool,

    pub(crate) sleep_time: f32,

    fixtures: Vec<Fixture>,
    next_fixture_id: u32,
    pub(crate) controllers: ControllerSet,

    collision_layer: CollisionLayer,
    collision_mask: CollisionLayer,

    pending_events: Vec<PhysicsEvent>,
}

impl Body {
    /// Create a body of the given type
    pub fn new(owner: EntityUid, body_type: BodyType) -> Self {
        Self {
            owner,
            body_type,
            status: BodyStatus::default(),
            mass: 1.0,
            inv_mass: if body_type == BodyType::Dynamic { 1.0 } else { 0.0 },
            inertia: 0.0,
            inv_inertia: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            fixed_rotation: false,
            can_collide: true,
            sleeping_allowed: true,
            awake: body_type != BodyType::Static,
            predict: false,
            sleep_time: 0.0,
            fixtures: Vec::new(),
            next_fixture_id: 0,
            controllers: ControllerSet::new(),
            collision_layer: CollisionLayer::NONE,
            collision_mask: CollisionLayer::NONE,
            pending_events: Vec::new(),
        }
    }

    /// Create a static body
    pub fn fixed(owner: EntityUid) -> Self {
        Self::new(owner, BodyType::Static)
    }

    /// Create a dynamic body
    pub fn dynamic(owner: EntityUid) -> Self {
        Self::new(owner, BodyType::Dynamic)
    }

    /// Create a kinematic body
    pub fn kinematic(owner: EntityUid) -> Self {
        Self::new(owner, BodyType::Kinematic)
    }

    /// Set the mass (builder form)
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.set_mass(mass);
        self
    }

    /// Set damping (builder form)
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Set fixed rotation (builder form)
    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.set_fixed_rotation(fixed);
        self
    }

    /// Set whether the body may sleep (builder form)
    pub fn with_sleeping_allowed(mut self, allowed: bool) -> Self {
        self.set_sleeping_allowed(allowed);
        self
    }

    // ==================== Body type ====================

    /// The body type
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Change the body type. Transitions to Static bring the body to rest;
    /// transitions to or from Static report an anchoring change.
    pub fn set_body_type(&mut self, body_type: BodyType) {
        if self.body_type == body_type {
            return;
        }
        let was_anchored = self.body_type == BodyType::Static;
        self.body_type = body_type;

        if body_type == BodyType::Static {
            self.set_awake(false);
            self.reset_dynamics();
            self.sleep_time = 0.0;
        } else {
            self.set_awake(true);
        }
        self.reset_mass_data();

        let anchored = body_type == BodyType::Static;
        if was_anchored != anchored {
            self.push_event(PhysicsEvent::AnchoredChanged {
                owner: self.owner,
                anchored,
            });
            self.push_event(PhysicsEvent::PhysicsUpdate { owner: self.owner });
        }
        self.dirty();
    }

    /// True when the body is Static
    pub fn anchored(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Anchor (Static) or release (Dynamic) the body
    pub fn set_anchored(&mut self, anchored: bool) {
        self.set_body_type(if anchored {
            BodyType::Static
        } else {
            BodyType::Dynamic
        });
    }

    /// Replicated movement status
    pub fn status(&self) -> BodyStatus {
        self.status
    }

    /// Set the replicated movement status
    pub fn set_status(&mut self, status: BodyStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        self.dirty();
    }

    // ==================== Mass & inertia ====================

    /// The mass in kilograms
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass; zero unless the body is Dynamic
    pub fn inv_mass(&self) -> f32 {
        if self.body_type == BodyType::Dynamic {
            self.inv_mass
        } else {
            0.0
        }
    }

    /// Set the mass. Ignored on non-Dynamic bodies; non-positive values are
    /// substituted with 1 kg; writes equal within tolerance change nothing.
    pub fn set_mass(&mut self, mass: f32) {
        if self.body_type != BodyType::Dynamic {
            return;
        }
        debug_assert!(mass.is_finite(), "non-finite mass for {}", self.owner);
        if !mass.is_finite() {
            return;
        }
        let mass = if mass <= 0.0 { 1.0 } else { mass };
        if close_to(self.mass, mass) {
            return;
        }
        self.mass = mass;
        self.inv_mass = 1.0 / mass;
        self.reset_mass_data();
        self.dirty();
    }

    /// Rotational inertia
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    /// Inverse rotational inertia; zero unless Dynamic and free to rotate
    pub fn inv_inertia(&self) -> f32 {
        if self.body_type == BodyType::Dynamic {
            self.inv_inertia
        } else {
            0.0
        }
    }

    /// Set the rotational inertia. Only meaningful on Dynamic bodies that
    /// are free to rotate; non-positive values are a programmer error.
    pub fn set_inertia(&mut self, inertia: f32) {
        if self.body_type != BodyType::Dynamic || self.fixed_rotation {
            return;
        }
        debug_assert!(
            inertia.is_finite() && inertia > 0.0,
            "bad inertia {inertia} for {}",
            self.owner
        );
        if !inertia.is_finite() || inertia <= 0.0 {
            return;
        }
        if close_to(self.inertia, inertia) {
            return;
        }
        self.inertia = inertia;
        self.inv_inertia = 1.0 / inertia;
        self.dirty();
    }

    /// Recompute derived mass data from the body type, rotation lock and
    /// fixture set.
    pub fn reset_mass_data(&mut self) {
        if self.body_type != BodyType::Dynamic {
            self.inv_mass = 0.0;
            self.inv_inertia = 0.0;
            return;
        }
        self.inv_mass = 1.0 / self.mass;

        if self.fixed_rotation {
            self.inertia = 0.0;
            self.inv_inertia = 0.0;
            return;
        }
        if self.inertia <= 0.0 {
            // Bounding-extent fallback when no explicit inertia was set.
            let mut extent_sq: f32 = 0.0;
            for fixture in &self.fixtures {
                let bounds = fixture.shape.calculate_local_bounds(0.0);
                if bounds.is_valid() {
                    extent_sq = extent_sq.max(bounds.half_extents().length_squared());
                }
            }
            self.inertia = self.mass * extent_sq;
        }
        self.inv_inertia = if self.inertia > 0.0 {
            1.0 / self.inertia
        } else {
            0.0
        };
    }

    /// True if rotation is locked
    pub fn fixed_rotation(&self) -> bool {
        self.fixed_rotation
    }

    /// Lock or unlock rotation. Locking zeroes the angular velocity
    /// immediately.
    pub fn set_fixed_rotation(&mut self, fixed: bool) {
        if self.fixed_rotation == fixed {
            return;
        }
        self.fixed_rotation = fixed;
        self.angular_velocity = 0.0;
        self.reset_mass_data();
        self.dirty();
    }

    // ==================== Velocities & forces ====================

    /// Linear velocity in m/s
    pub fn linear_velocity(&self) -> Vec2 {
        self.linear_velocity
    }

    /// Set the linear velocity. Static bodies ignore the write; nonzero
    /// writes wake the body; writes equal within tolerance change nothing.
    pub fn set_linear_velocity(&mut self, velocity: Vec2) {
        if self.body_type == BodyType::Static {
            return;
        }
        debug_assert!(velocity.is_finite(), "non-finite velocity for {}", self.owner);
        if !velocity.is_finite() {
            return;
        }
        if velocity != Vec2::ZERO {
            self.set_awake(true);
        }
        if close_to(self.linear_velocity.x, velocity.x)
            && close_to(self.linear_velocity.y, velocity.y)
        {
            return;
        }
        self.linear_velocity = velocity;
        self.dirty();
    }

    /// Angular velocity in rad/s
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Set the angular velocity, under the same rules as
    /// [`set_linear_velocity`](Self::set_linear_velocity)
    pub fn set_angular_velocity(&mut self, velocity: f32) {
        if self.body_type == BodyType::Static {
            return;
        }
        debug_assert!(velocity.is_finite(), "non-finite spin for {}", self.owner);
        if !velocity.is_finite() {
            return;
        }
        if velocity != 0.0 {
            self.set_awake(true);
        }
        if close_to(self.angular_velocity, velocity) {
            return;
        }
        self.angular_velocity = velocity;
        self.dirty();
    }

    /// Linear momentum (kg * m/s)
    pub fn momentum(&self) -> Vec2 {
        self.linear_velocity * self.mass
    }

    /// Accumulate a force for the next integration step
    pub fn apply_force(&mut self, force: Vec2) {
        if self.body_type != BodyType::Dynamic || !force.is_finite() {
            return;
        }
        self.set_awake(true);
        self.force += force;
    }

    /// Accumulate a torque for the next integration step
    pub fn apply_torque(&mut self, torque: f32) {
        if self.body_type != BodyType::Dynamic || !torque.is_finite() {
            return;
        }
        self.set_awake(true);
        self.torque += torque;
    }

    /// Apply an instantaneous linear impulse
    pub fn apply_linear_impulse(&mut self, impulse: Vec2) {
        if self.body_type != BodyType::Dynamic || !impulse.is_finite() {
            return;
        }
        self.set_awake(true);
        let velocity = self.linear_velocity + impulse * self.inv_mass;
        self.set_linear_velocity(velocity);
    }

    /// Apply an instantaneous angular impulse
    pub fn apply_angular_impulse(&mut self, impulse: f32) {
        if self.body_type != BodyType::Dynamic || !impulse.is_finite() {
            return;
        }
        self.set_awake(true);
        let velocity = self.angular_velocity + impulse * self.inv_inertia;
        self.set_angular_velocity(velocity);
    }

    /// Zero all motion and accumulated forces
    pub fn reset_dynamics(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
        self.linear_velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
    }

    // ==================== Sleep ====================

    /// True while the body simulates
    pub fn awake(&self) -> bool {
        self.awake
    }

    /// Wake or sleep the body. Transitions report Wake/Sleep exactly once;
    /// Static bodies cannot be woken; sleeping resets all motion.
    pub fn set_awake(&mut self, awake: bool) {
        if self.awake == awake {
            return;
        }
        if awake && self.body_type == BodyType::Static {
            return;
        }
        self.awake = awake;
        self.sleep_time = 0.0;
        if awake {
            self.push_event(PhysicsEvent::Wake { owner: self.owner });
        } else {
            self.reset_dynamics();
            self.push_event(PhysicsEvent::Sleep { owner: self.owner });
        }
    }

    /// Wake the body
    pub fn wake(&mut self) {
        self.set_awake(true);
    }

    /// True if this body may fall asleep
    pub fn sleeping_allowed(&self) -> bool {
        self.sleeping_allowed
    }

    /// Allow or forbid sleeping. Forbidding wakes the body.
    pub fn set_sleeping_allowed(&mut self, allowed: bool) {
        if self.sleeping_allowed == allowed {
            return;
        }
        if !allowed {
            self.set_awake(true);
        }
        self.sleeping_allowed = allowed;
        self.dirty();
    }

    /// Client-side prediction flag; predicted bodies do not accumulate
    /// sleep time
    pub fn predict(&self) -> bool {
        self.predict
    }

    /// Set the prediction flag
    pub fn set_predict(&mut self, predict: bool) {
        self.predict = predict;
    }

    // ==================== Collision ====================

    /// True if the body participates in collision
    pub fn can_collide(&self) -> bool {
        self.can_collide
    }

    /// Toggle collision participation. Fixtures are retained while
    /// disabled; broadphase membership is handled by the world.
    pub fn set_can_collide(&mut self, can_collide: bool) {
        if self.can_collide == can_collide {
            return;
        }
        self.can_collide = can_collide;
        self.push_event(PhysicsEvent::CollisionChange {
            owner: self.owner,
            can_collide,
        });
        self.push_event(PhysicsEvent::PhysicsUpdate { owner: self.owner });
        self.dirty();
    }

    /// True if any fixture is hard
    pub fn hard(&self) -> bool {
        self.fixtures.iter().any(|f| f.hard)
    }

    /// Union of all fixture layers
    pub fn collision_layer(&self) -> CollisionLayer {
        self.collision_layer
    }

    /// Union of all fixture masks
    pub fn collision_mask(&self) -> CollisionLayer {
        self.collision_mask
    }

    // ==================== Fixtures ====================

    /// Attach a fixture, assigning it an id
    pub fn add_fixture(&mut self, mut fixture: Fixture) -> FixtureId {
        let id = FixtureId(self.next_fixture_id);
        self.next_fixture_id += 1;
        fixture.id = id;
        self.fixtures.push(fixture);
        self.refresh_collision_filters();
        self.reset_mass_data();
        self.push_event(PhysicsEvent::FixtureUpdate {
            owner: self.owner,
            fixture: id,
        });
        self.push_event(PhysicsEvent::PhysicsUpdate { owner: self.owner });
        self.dirty();
        id
    }

    /// Detach a fixture, returning it so its proxies can be released.
    /// Unknown ids are logged and ignored.
    pub(crate) fn take_fixture(&mut self, id: FixtureId) -> Option<Fixture> {
        let Some(index) = self.fixtures.iter().position(|f| f.id == id) else {
            log::error!("Tried to remove unknown fixture {id:?} from {}", self.owner);
            return None;
        };
        let fixture = self.fixtures.remove(index);
        self.refresh_collision_filters();
        self.reset_mass_data();
        self.push_event(PhysicsEvent::FixtureUpdate {
            owner: self.owner,
            fixture: id,
        });
        self.push_event(PhysicsEvent::PhysicsUpdate { owner: self.owner });
        self.dirty();
        Some(fixture)
    }

    /// Replace a fixture's shape. Dirties the body and requests a
    /// broadphase resync; the two obligations are independent.
    pub fn set_fixture_shape(&mut self, id: FixtureId, shape: crate::shape::PhysShape) -> Result<()> {
        shape.apply_state()?;
        let fixture = self
            .fixtures
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(PhysicsError::FixtureNotFound(self.owner, id))?;
        fixture.shape = shape;
        self.reset_mass_data();
        self.push_event(PhysicsEvent::FixtureUpdate {
            owner: self.owner,
            fixture: id,
        });
        self.push_event(PhysicsEvent::PhysicsUpdate { owner: self.owner });
        self.dirty();
        Ok(())
    }

    /// Change a fixture's collision filters, refreshing the body unions
    pub fn set_fixture_filters(
        &mut self,
        id: FixtureId,
        layer: CollisionLayer,
        mask: CollisionLayer,
    ) -> Result<()> {
        let fixture = self
            .fixtures
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(PhysicsError::FixtureNotFound(self.owner, id))?;
        fixture.collision_layer = layer;
        fixture.collision_mask = mask;
        self.refresh_collision_filters();
        self.dirty();
        Ok(())
    }

    /// The attached fixtures
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Look up a fixture by id
    pub fn get_fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub(crate) fn fixtures_mut(&mut self) -> &mut Vec<Fixture> {
        &mut self.fixtures
    }

    /// Replace the whole fixture set (snapshot application)
    pub(crate) fn replace_fixtures(&mut self, fixtures: Vec<Fixture>) {
        self.next_fixture_id = fixtures
            .iter()
            .map(|f| f.id.0 + 1)
            .max()
            .unwrap_or(self.next_fixture_id);
        self.fixtures = fixtures;
        self.refresh_collision_filters();
        self.reset_mass_data();
        self.push_event(PhysicsEvent::PhysicsUpdate { owner: self.owner });
    }

    fn refresh_collision_filters(&mut self) {
        self.collision_layer = self
            .fixtures
            .iter()
            .fold(CollisionLayer::NONE, |acc, f| acc | f.collision_layer);
        self.collision_mask = self
            .fixtures
            .iter()
            .fold(CollisionLayer::NONE, |acc, f| acc | f.collision_mask);
    }

    // ==================== Controllers ====================

    /// Attach a controller; fails if one of the same kind exists
    pub fn add_controller(&mut self, state: ControllerState) -> Result<()> {
        let owner = self.owner;
        self.controllers.add(owner, state).map(|_| ())
    }

    /// Attach a controller, replacing any existing one of the same kind
    pub fn set_controller(&mut self, state: ControllerState) -> Option<Controller> {
        let owner = self.owner;
        self.controllers.set(owner, state)
    }

    /// Get the controller of `kind`, creating a default one if absent;
    /// the bool reports pre-existence
    pub fn ensure_controller(&mut self, kind: ControllerKind) -> (&mut Controller, bool) {
        let owner = self.owner;
        self.controllers.ensure(owner, kind)
    }

    /// Detach the controller of `kind`; false if absent
    pub fn remove_controller(&mut self, kind: ControllerKind) -> bool {
        self.controllers.remove(kind).is_some()
    }

    /// Detach all controllers
    pub fn remove_controllers(&mut self) {
        self.controllers.remove_all();
    }

    /// Stop every controller; true only if all could stop
    pub fn stop_controllers(&mut self) -> bool {
        self.controllers.stop_all()
    }

    /// Look up a controller
    pub fn controller(&self, kind: ControllerKind) -> Option<&Controller> {
        self.controllers.get(kind)
    }

    /// Look up a controller mutably
    pub fn controller_mut(&mut self, kind: ControllerKind) -> Option<&mut Controller> {
        self.controllers.get_mut(kind)
    }

    // ==================== Bounds, state, events ====================

    /// World-space bounds of all fixtures at `transform`. Bodies without
    /// fixtures occupy a point.
    pub fn world_aabb(&self, transform: &Transform2) -> Aabb {
        if self.fixtures.is_empty() {
            return Aabb::new(transform.position, transform.position);
        }
        let mut aabb = Aabb::EMPTY;
        for fixture in &self.fixtures {
            aabb = aabb.union(
                &fixture
                    .shape
                    .calculate_local_bounds(transform.rotation)
                    .translated(transform.position),
            );
        }
        aabb
    }

    /// Capture the replicated snapshot of this body
    pub fn get_state(&self) -> PhysicsState {
        PhysicsState::capture(self)
    }

    /// Events recorded since the last drain
    pub fn pending_events(&self) -> &[PhysicsEvent] {
        &self.pending_events
    }

    pub(crate) fn drain_pending_events(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub(crate) fn dirty(&mut self) {
        self.push_event(PhysicsEvent::Dirty { owner: self.owner });
    }

    fn push_event(&mut self, event: PhysicsEvent) {
        self.pending_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::PhysShape;
    use approx::assert_relative_eq;

    const UID: EntityUid = EntityUid(42);

    fn dirty_count(body: &Body) -> usize {
        body.pending_events()
            .iter()
            .filter(|e| matches!(e, PhysicsEvent::Dirty { .. }))
            .count()
    }

    #[test]
    fn test_mass_clamps_to_one_kilogram() {
        let mut body = Body::dynamic(UID);
        body.set_mass(-3.0);
        assert_relative_eq!(body.mass(), 1.0);
        body.set_mass(0.0);
        assert_relative_eq!(body.mass(), 1.0);
        body.set_mass(4.0);
        assert_relative_eq!(body.inv_mass(), 0.25);
    }

    #[test]
    fn test_mass_write_ignored_on_static() {
        let mut body = Body::fixed(UID);
        body.set_mass(5.0);
        assert_relative_eq!(body.mass(), 1.0);
        assert_relative_eq!(body.inv_mass(), 0.0);
        assert_eq!(dirty_count(&body), 0);
    }

    #[test]
    fn test_repeated_mass_write_dirties_once() {
        let mut body = Body::dynamic(UID);
        body.set_mass(2.0);
        body.set_mass(2.0);
        body.set_mass(2.0 + 1e-7);
        assert_eq!(dirty_count(&body), 1);
    }

    #[test]
    fn test_inv_mass_gated_on_body_type() {
        let mut body = Body::dynamic(UID).with_mass(2.0);
        assert_relative_eq!(body.inv_mass(), 0.5);
        body.set_body_type(BodyType::Kinematic);
        assert_relative_eq!(body.inv_mass(), 0.0);
    }

    #[test]
    fn test_static_ignores_velocity_writes() {
        let mut body = Body::fixed(UID);
        body.set_linear_velocity(Vec2::new(1.0, 0.0));
        body.set_angular_velocity(2.0);
        assert_eq!(body.linear_velocity(), Vec2::ZERO);
        assert_eq!(body.angular_velocity(), 0.0);
        assert!(!body.awake());
    }

    #[test]
    fn test_nonzero_velocity_wakes() {
        let mut body = Body::dynamic(UID);
        body.set_awake(false);
        assert!(!body.awake());
        body.set_linear_velocity(Vec2::new(0.5, 0.0));
        assert!(body.awake());
    }

    #[test]
    fn test_fixed_rotation_zeroes_spin_immediately() {
        let mut body = Body::dynamic(UID);
        body.set_angular_velocity(3.0);
        body.set_fixed_rotation(true);
        assert_eq!(body.angular_velocity(), 0.0);
        assert_relative_eq!(body.inv_inertia(), 0.0);
    }

    #[test]
    fn test_layer_and_mask_are_fixture_unions() {
        let mut body = Body::dynamic(UID);
        let a = body.add_fixture(
            Fixture::new(PhysShape::unit_box())
                .with_collision_layer(CollisionLayer::MOB)
                .with_collision_mask(CollisionLayer::STRUCTURE),
        );
        body.add_fixture(
            Fixture::new(PhysShape::circle(0.2))
                .with_collision_layer(CollisionLayer::ITEM)
                .with_collision_mask(CollisionLayer::MOB),
        );
        assert_eq!(
            body.collision_layer(),
            CollisionLayer::MOB | CollisionLayer::ITEM
        );
        assert_eq!(
            body.collision_mask(),
            CollisionLayer::STRUCTURE | CollisionLayer::MOB
        );

        body.take_fixture(a);
        assert_eq!(body.collision_layer(), CollisionLayer::ITEM);
        assert_eq!(body.collision_mask(), CollisionLayer::MOB);
    }

    #[test]
    fn test_sleep_wake_events_fire_once_per_transition() {
        let mut body = Body::dynamic(UID);
        body.set_awake(false);
        body.set_awake(false);
        body.set_awake(true);
        body.set_awake(true);

        let events = body.pending_events();
        let sleeps = events
            .iter()
            .filter(|e| matches!(e, PhysicsEvent::Sleep { .. }))
            .count();
        let wakes = events
            .iter()
            .filter(|e| matches!(e, PhysicsEvent::Wake { .. }))
            .count();
        assert_eq!(sleeps, 1);
        assert_eq!(wakes, 1);
    }

    #[test]
    fn test_sleep_resets_dynamics() {
        let mut body = Body::dynamic(UID);
        body.apply_force(Vec2::new(10.0, 0.0));
        body.set_linear_velocity(Vec2::new(1.0, 1.0));
        body.set_awake(false);
        assert_eq!(body.force, Vec2::ZERO);
        assert_eq!(body.linear_velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_static_cannot_wake() {
        let mut body = Body::fixed(UID);
        body.wake();
        assert!(!body.awake());
    }

    #[test]
    fn test_anchoring_fires_transition_events() {
        let mut body = Body::dynamic(UID);
        body.set_anchored(true);
        body.set_anchored(true);
        let changes: Vec<_> = body
            .pending_events()
            .iter()
            .filter_map(|e| match e {
                PhysicsEvent::AnchoredChanged { anchored, .. } => Some(*anchored),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![true]);
        assert!(body.anchored());
    }

    #[test]
    fn test_can_collide_toggle_reports_change() {
        let mut body = Body::dynamic(UID);
        body.add_fixture(Fixture::new(PhysShape::unit_box()));
        body.set_can_collide(false);
        body.set_can_collide(false);

        let changes: Vec<_> = body
            .pending_events()
            .iter()
            .filter_map(|e| match e {
                PhysicsEvent::CollisionChange { can_collide, .. } => Some(*can_collide),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![false]);
        // Fixtures survive the toggle.
        assert_eq!(body.fixtures().len(), 1);
    }

    #[test]
    fn test_impulse_scales_by_inv_mass() {
        let mut body = Body::dynamic(UID).with_mass(2.0);
        body.apply_linear_impulse(Vec2::new(4.0, 0.0));
        assert_relative_eq!(body.linear_velocity().x, 2.0);

        let mut anchored = Body::fixed(UID);
        anchored.apply_linear_impulse(Vec2::new(4.0, 0.0));
        assert_eq!(anchored.linear_velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_forbidding_sleep_wakes() {
        let mut body = Body::dynamic(UID);
        body.set_awake(false);
        body.set_sleeping_allowed(false);
        assert!(body.awake());
    }

    #[test]
    fn test_world_aabb_unions_fixtures() {
        let mut body = Body::dynamic(UID);
        body.add_fixture(Fixture::new(PhysShape::unit_box()));
        body.add_fixture(Fixture::new(PhysShape::Circle {
            offset: Vec2::new(2.0, 0.0),
            radius: 0.5,
        }));
        let aabb = body.world_aabb(&Transform2::from_translation(Vec2::new(10.0, 0.0)));
        assert_relative_eq!(aabb.min.x, 9.5);
        assert_relative_eq!(aabb.max.x, 12.5);
    }
}
