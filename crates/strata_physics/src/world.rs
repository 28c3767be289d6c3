//! Physics world: body registry, per-grid broadphases, stepping
//!
//! The world owns every body and one [`BroadPhase`] per (map, grid) pair a
//! body has ever touched. A body straddling several grids holds a proxy set
//! in each of their broadphases, each computed in that grid's local frame.
//!
//! Cross-system lookups (transforms, grid enumeration) go through an
//! explicit [`PhysicsContext`] passed into every operation that needs one.

use std::collections::HashMap;

use strata_math::{Aabb, Transform2, Vec2};

use crate::body::{Body, BodyType};
use crate::broadphase::{BroadPhase, ProxyData};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::EventCollector;
use crate::fixture::{Fixture, FixtureProxy};
use crate::ids::{EntityUid, FixtureId, GridId, MapId};
use crate::layers::should_collide;
use crate::query::{RayCastHit, RayCastOptions};
use crate::shape::PhysShape;
use crate::state::PhysicsState;

/// The world's view of the surrounding engine
pub trait PhysicsContext {
    /// World transform of an entity
    fn world_transform(&self, entity: EntityUid) -> Transform2;

    /// Map an entity currently lives on
    fn map_id(&self, entity: EntityUid) -> MapId;

    /// Grids on `map` whose world bounds intersect `aabb`. Implementations
    /// need not include [`GridId::INVALID`]; the world adds it.
    fn grids_intersecting(&self, map: MapId, aabb: &Aabb) -> Vec<GridId>;

    /// World transform of a grid. [`GridId::INVALID`] is the map's own
    /// frame and must be the identity.
    fn grid_transform(&self, map: MapId, grid: GridId) -> Transform2;
}

/// The physics world
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: HashMap<EntityUid, Body>,
    broadphases: HashMap<(MapId, GridId), BroadPhase>,
    /// Map each body's proxies were registered on
    registered_maps: HashMap<EntityUid, MapId>,
    events: EventCollector,
}

impl PhysicsWorld {
    /// Create a world with the given configuration
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            bodies: HashMap::new(),
            broadphases: HashMap::new(),
            registered_maps: HashMap::new(),
            events: EventCollector::new(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Total live proxies across every broadphase
    pub fn proxy_count(&self) -> usize {
        self.broadphases.values().map(BroadPhase::proxy_count).sum()
    }

    // ==================== Bodies ====================

    /// Register a body and create its broadphase proxies
    pub fn add_body(&mut self, body: Body, ctx: &dyn PhysicsContext) {
        let uid = body.owner;
        if self.bodies.contains_key(&uid) {
            log::warn!("Replacing existing physics body for {uid}");
            self.destroy_all_proxies(uid);
        }
        self.bodies.insert(uid, body);
        self.create_proxies(uid, ctx);
    }

    /// Remove a body, releasing every proxy it holds
    pub fn remove_body(&mut self, uid: EntityUid) -> Result<Body> {
        self.destroy_all_proxies(uid);
        let mut body = self
            .bodies
            .remove(&uid)
            .ok_or(PhysicsError::BodyNotFound(uid))?;
        body.remove_controllers();
        Ok(body)
    }

    /// Look up a body
    pub fn body(&self, uid: EntityUid) -> Result<&Body> {
        self.bodies.get(&uid).ok_or(PhysicsError::BodyNotFound(uid))
    }

    /// Look up a body mutably
    pub fn body_mut(&mut self, uid: EntityUid) -> Result<&mut Body> {
        self.bodies
            .get_mut(&uid)
            .ok_or(PhysicsError::BodyNotFound(uid))
    }

    // ==================== Proxy lifecycle ====================

    /// Register broadphase proxies for a body on every grid it overlaps.
    /// Skips silently when the body cannot collide; a body with invalid
    /// bounds is skipped with a warning so one bad body cannot stall the
    /// tick.
    pub fn create_proxies(&mut self, uid: EntityUid, ctx: &dyn PhysicsContext) {
        let Some(body) = self.bodies.get_mut(&uid) else {
            return;
        };
        if !body.can_collide() {
            return;
        }
        let transform = ctx.world_transform(uid);
        let world_aabb = body.world_aabb(&transform);
        if !world_aabb.is_valid() {
            log::warn!("Skipping proxy creation for {uid}: invalid bounds {world_aabb:?}");
            return;
        }
        let map = ctx.map_id(uid);
        self.registered_maps.insert(uid, map);

        let grids = grids_for(ctx, map, &world_aabb);
        for grid in grids {
            register_on_grid(
                &mut self.broadphases,
                &self.config,
                body,
                map,
                grid,
                &transform,
                ctx,
            );
        }
    }

    /// Release every proxy a body holds
    pub fn destroy_all_proxies(&mut self, uid: EntityUid) {
        let Some(map) = self.registered_maps.remove(&uid) else {
            return;
        };
        let Some(body) = self.bodies.get_mut(&uid) else {
            return;
        };
        for fixture in body.fixtures_mut() {
            for (grid, proxies) in fixture.proxies.drain() {
                if let Some(bp) = self.broadphases.get_mut(&(map, grid)) {
                    for proxy in proxies {
                        bp.destroy_proxy(proxy.proxy_id);
                    }
                }
            }
        }
    }

    /// Bring a body's proxies in line with its current transform: departed
    /// grids lose their proxies, retained grids get moved proxies, newly
    /// entered grids get fresh ones.
    pub fn synchronize_fixtures(&mut self, uid: EntityUid, ctx: &dyn PhysicsContext) {
        let transform = ctx.world_transform(uid);
        let (can_collide, world_aabb) = match self.bodies.get(&uid) {
            Some(body) => (body.can_collide(), body.world_aabb(&transform)),
            None => return,
        };
        if !can_collide {
            self.destroy_all_proxies(uid);
            return;
        }
        if !world_aabb.is_valid() {
            log::warn!("Skipping fixture sync for {uid}: invalid bounds {world_aabb:?}");
            return;
        }

        let map = ctx.map_id(uid);
        let old_map = self.registered_maps.get(&uid).copied();
        if old_map.is_some() && old_map != Some(map) {
            // Map change: nothing carries over.
            self.destroy_all_proxies(uid);
        }
        self.registered_maps.insert(uid, map);

        let desired = grids_for(ctx, map, &world_aabb);
        let Some(body) = self.bodies.get_mut(&uid) else {
            return;
        };

        // Departed grids.
        let current: Vec<GridId> = body
            .fixtures()
            .iter()
            .flat_map(|f| f.registered_grids())
            .collect();
        for grid in current {
            if desired.contains(&grid) {
                continue;
            }
            for fixture in body.fixtures_mut() {
                if let Some(proxies) = fixture.proxies.remove(&grid) {
                    if let Some(bp) = self.broadphases.get_mut(&(map, grid)) {
                        for proxy in proxies {
                            bp.destroy_proxy(proxy.proxy_id);
                        }
                    }
                }
            }
        }

        // Retained and new grids.
        for grid in desired {
            let grid_transform = ctx.grid_transform(map, grid);
            let offset = transform.position - grid_transform.position;
            let rotation = transform.rotation - grid_transform.rotation;
            let bp = self
                .broadphases
                .entry((map, grid))
                .or_insert_with(|| BroadPhase::new(self.config.broadphase_expand));

            let owner = body.owner;
            for fixture in body.fixtures_mut() {
                let aabb = fixture
                    .shape
                    .calculate_local_bounds(rotation)
                    .translated(offset);
                match fixture.proxies.get_mut(&grid) {
                    Some(proxies) => {
                        for proxy in proxies.iter_mut() {
                            proxy.aabb = aabb;
                            bp.move_proxy(proxy.proxy_id, aabb);
                        }
                    }
                    None => {
                        let proxies = add_fixture_proxies(bp, owner, fixture, aabb);
                        fixture.proxies.insert(grid, proxies);
                    }
                }
            }
        }
    }

    // ==================== Body mutation wrappers ====================

    /// Toggle collision participation, updating broadphase membership
    pub fn set_can_collide(
        &mut self,
        uid: EntityUid,
        can_collide: bool,
        ctx: &dyn PhysicsContext,
    ) -> Result<()> {
        self.body_mut(uid)?.set_can_collide(can_collide);
        if can_collide {
            self.create_proxies(uid, ctx);
        } else {
            self.destroy_all_proxies(uid);
        }
        Ok(())
    }

    /// Attach a fixture and register its proxies
    pub fn add_fixture(
        &mut self,
        uid: EntityUid,
        fixture: Fixture,
        ctx: &dyn PhysicsContext,
    ) -> Result<FixtureId> {
        let id = self.body_mut(uid)?.add_fixture(fixture);
        self.synchronize_fixtures(uid, ctx);
        Ok(id)
    }

    /// Detach a fixture, releasing its proxies. Unknown ids are logged by
    /// the body and reported as false.
    pub fn remove_fixture(
        &mut self,
        uid: EntityUid,
        id: FixtureId,
        ctx: &dyn PhysicsContext,
    ) -> Result<bool> {
        let map = self.registered_maps.get(&uid).copied();
        let body = self.body_mut(uid)?;
        let Some(mut fixture) = body.take_fixture(id) else {
            return Ok(false);
        };
        if let Some(map) = map {
            for (grid, proxies) in fixture.proxies.drain() {
                if let Some(bp) = self.broadphases.get_mut(&(map, grid)) {
                    for proxy in proxies {
                        bp.destroy_proxy(proxy.proxy_id);
                    }
                }
            }
        }
        self.synchronize_fixtures(uid, ctx);
        Ok(true)
    }

    /// Replace a fixture's shape and resync its proxies
    pub fn set_fixture_shape(
        &mut self,
        uid: EntityUid,
        id: FixtureId,
        shape: PhysShape,
        ctx: &dyn PhysicsContext,
    ) -> Result<()> {
        self.body_mut(uid)?.set_fixture_shape(id, shape)?;
        self.synchronize_fixtures(uid, ctx);
        Ok(())
    }

    /// Apply an authoritative snapshot: fixtures are replaced wholesale and
    /// broadphase membership is rebuilt
    pub fn apply_state(
        &mut self,
        uid: EntityUid,
        state: &PhysicsState,
        ctx: &dyn PhysicsContext,
    ) -> Result<()> {
        self.destroy_all_proxies(uid);
        let body = self.body_mut(uid)?;
        state.apply(body)?;
        self.create_proxies(uid, ctx);
        Ok(())
    }

    // ==================== Stepping ====================

    /// Advance one fixed tick: controllers, velocity integration, proxy
    /// synchronization, sleep management
    pub fn step(&mut self, dt: f32, ctx: &dyn PhysicsContext) {
        self.apply_controllers(dt);
        self.integrate_velocities(dt);

        let awake: Vec<EntityUid> = self
            .bodies
            .values()
            .filter(|b| b.awake())
            .map(|b| b.owner)
            .collect();
        log::debug!("physics step dt={dt}: {} awake bodies", awake.len());
        for uid in awake {
            self.synchronize_fixtures(uid, ctx);
        }

        self.update_sleep(dt);
    }

    /// Run every attached controller on awake dynamic bodies
    pub fn apply_controllers(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            if !body.awake() || body.body_type() != BodyType::Dynamic {
                continue;
            }
            // Controllers live in the body; take them out to resolve the
            // borrow while they mutate it.
            let controllers = std::mem::take(&mut body.controllers);
            for controller in controllers.iter() {
                let delta = controller.velocity_change(body.linear_velocity(), dt);
                if delta != Vec2::ZERO {
                    let velocity = body.linear_velocity() + delta;
                    body.set_linear_velocity(velocity);
                }
            }
            body.controllers = controllers;
        }
    }

    /// Integrate accumulated forces into velocities and apply damping
    pub fn integrate_velocities(&mut self, dt: f32) {
        let auto_clear = self.config.auto_clear_forces;
        for body in self.bodies.values_mut() {
            if !body.awake() || body.body_type() != BodyType::Dynamic {
                continue;
            }
            let mut v = body.linear_velocity() + body.force * body.inv_mass() * dt;
            let mut w = body.angular_velocity() + dt * body.inv_inertia() * body.torque;

            v *= (1.0 - dt * body.linear_damping).clamp(0.0, 1.0);
            w *= (1.0 - dt * body.angular_damping).clamp(0.0, 1.0);

            body.set_linear_velocity(v);
            body.set_angular_velocity(w);

            if auto_clear {
                body.force = Vec2::ZERO;
                body.torque = 0.0;
            }
        }
    }

    /// Accumulate sleep time on quiet bodies and put them to sleep once the
    /// timer runs out. Predicted bodies never accumulate.
    pub fn update_sleep(&mut self, dt: f32) {
        if !self.config.sleeping_enabled {
            return;
        }
        let linear_sq =
            self.config.linear_sleep_tolerance * self.config.linear_sleep_tolerance;
        let angular = self.config.angular_sleep_tolerance;

        for body in self.bodies.values_mut() {
            if !body.awake() || body.body_type() != BodyType::Dynamic || body.predict() {
                continue;
            }
            let quiet = body.sleeping_allowed()
                && body.linear_velocity().length_squared() <= linear_sq
                && body.angular_velocity().abs() <= angular;
            if !quiet {
                body.sleep_time = 0.0;
                continue;
            }
            body.sleep_time += dt;
            if body.sleep_time >= self.config.time_to_sleep {
                body.set_awake(false);
            }
        }
    }

    // ==================== Queries ====================

    /// Entities whose proxies overlap `uid`'s bounds and whose layer matches
    /// `uid`'s mask. The union of every grid the body overlaps is searched.
    pub fn get_colliding_entities(
        &self,
        uid: EntityUid,
        ctx: &dyn PhysicsContext,
    ) -> Result<Vec<EntityUid>> {
        let body = self.body(uid)?;
        if !body.can_collide() {
            return Ok(Vec::new());
        }
        let transform = ctx.world_transform(uid);
        let world_aabb = body.world_aabb(&transform);
        let mask = body.collision_mask();
        let mut hits = self.query_entities(uid, ctx, &world_aabb, |other| {
            should_collide(mask, other.collision_layer()) && other.can_collide()
        });
        hits.sort_unstable();
        hits.dedup();
        Ok(hits)
    }

    /// True if moving `uid` by `offset` would overlap a hard body it can
    /// collide with
    pub fn is_colliding(
        &self,
        uid: EntityUid,
        offset: Vec2,
        ctx: &dyn PhysicsContext,
    ) -> Result<bool> {
        let body = self.body(uid)?;
        if !body.can_collide() || !body.hard() {
            return Ok(false);
        }
        let transform = ctx.world_transform(uid);
        let world_aabb = body.world_aabb(&transform).translated(offset);
        let mask = body.collision_mask();
        let hits = self.query_entities(uid, ctx, &world_aabb, |other| {
            should_collide(mask, other.collision_layer()) && other.can_collide() && other.hard()
        });
        Ok(!hits.is_empty())
    }

    /// Cast a ray across a map, returning broadphase hits sorted by
    /// distance from `origin`. The ray is offset into the local frame of
    /// every grid its bounds cross; hit points come back in world space.
    /// A body registered on several grids yields a single hit.
    pub fn cast_ray(
        &self,
        map: MapId,
        origin: Vec2,
        direction: Vec2,
        options: &RayCastOptions,
        ctx: &dyn PhysicsContext,
    ) -> Vec<RayCastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return Vec::new();
        }
        let end = origin + direction * options.max_distance;
        let ray_aabb = Aabb::from_points(&[origin, end]);

        let mut hits = Vec::new();
        for grid in grids_for(ctx, map, &ray_aabb) {
            let Some(bp) = self.broadphases.get(&(map, grid)) else {
                continue;
            };
            let grid_transform = ctx.grid_transform(map, grid);
            let local_origin = origin - grid_transform.position;
            for (_, data, distance) in
                bp.query_ray(local_origin, direction, options.max_distance)
            {
                if options.exclude == Some(data.entity)
                    || !should_collide(options.mask, data.layer)
                {
                    continue;
                }
                let Some(other) = self.bodies.get(&data.entity) else {
                    continue;
                };
                if !other.can_collide() {
                    continue;
                }
                hits.push(RayCastHit {
                    entity: data.entity,
                    fixture: data.fixture,
                    point: origin + direction * distance,
                    distance,
                });
            }
        }
        hits.sort_unstable_by(|a, b| a.distance.total_cmp(&b.distance));
        // A fixture seen through several grids reports the same distance.
        hits.dedup_by(|a, b| a.entity == b.entity && a.fixture == b.fixture);
        hits
    }

    fn query_entities(
        &self,
        uid: EntityUid,
        ctx: &dyn PhysicsContext,
        world_aabb: &Aabb,
        filter: impl Fn(&Body) -> bool,
    ) -> Vec<EntityUid> {
        let map = ctx.map_id(uid);
        let mut hits = Vec::new();
        for grid in grids_for(ctx, map, world_aabb) {
            let Some(bp) = self.broadphases.get(&(map, grid)) else {
                continue;
            };
            let grid_transform = ctx.grid_transform(map, grid);
            let local = world_aabb.translated(-grid_transform.position);
            for (_, data) in bp.query_aabb(&local) {
                if data.entity == uid {
                    continue;
                }
                if let Some(other) = self.bodies.get(&data.entity) {
                    if filter(other) {
                        hits.push(data.entity);
                    }
                }
            }
        }
        hits
    }

    // ==================== Events ====================

    /// Collect every event recorded since the last drain, in per-body
    /// emission order
    pub fn drain_events(&mut self) -> EventCollector {
        let mut uids: Vec<EntityUid> = self.bodies.keys().copied().collect();
        uids.sort_unstable();
        for uid in uids {
            if let Some(body) = self.bodies.get_mut(&uid) {
                for event in body.drain_pending_events() {
                    self.events.push(event);
                }
            }
        }
        std::mem::take(&mut self.events)
    }
}

/// Grids a body's bounds overlap, always including the map default frame
fn grids_for(ctx: &dyn PhysicsContext, map: MapId, aabb: &Aabb) -> Vec<GridId> {
    let mut grids = ctx.grids_intersecting(map, aabb);
    if !grids.contains(&GridId::INVALID) {
        grids.push(GridId::INVALID);
    }
    grids
}

fn register_on_grid(
    broadphases: &mut HashMap<(MapId, GridId), BroadPhase>,
    config: &PhysicsConfig,
    body: &mut Body,
    map: MapId,
    grid: GridId,
    transform: &Transform2,
    ctx: &dyn PhysicsContext,
) {
    let grid_transform = ctx.grid_transform(map, grid);
    let offset = transform.position - grid_transform.position;
    let rotation = transform.rotation - grid_transform.rotation;
    let bp = broadphases
        .entry((map, grid))
        .or_insert_with(|| BroadPhase::new(config.broadphase_expand));

    let owner = body.owner;
    for fixture in body.fixtures_mut() {
        // At most one proxy set per (fixture, grid).
        if let Some(stale) = fixture.proxies.remove(&grid) {
            for proxy in stale {
                bp.destroy_proxy(proxy.proxy_id);
            }
        }
        let aabb = fixture
            .shape
            .calculate_local_bounds(rotation)
            .translated(offset);
        let proxies = add_fixture_proxies(bp, owner, fixture, aabb);
        fixture.proxies.insert(grid, proxies);
    }
}

fn add_fixture_proxies(
    bp: &mut BroadPhase,
    owner: EntityUid,
    fixture: &Fixture,
    aabb: Aabb,
) -> Vec<FixtureProxy> {
    let child_count = fixture.shape.child_count();
    let mut proxies = Vec::with_capacity(child_count);
    for child_index in 0..child_count {
        let proxy_id = bp.add_proxy(
            aabb,
            ProxyData {
                entity: owner,
                fixture: fixture.id,
                child_index,
                layer: fixture.collision_layer,
            },
        );
        proxies.push(FixtureProxy {
            aabb,
            child_index,
            proxy_id,
        });
    }
    proxies
}
