//! Strata Physics - rigid bodies and grid-aware broadphase
//!
//! Rigid body simulation for a networked, grid-based 2D world. Bodies own
//! their fixtures and controllers; a body overlapping several grids holds a
//! proxy set in each grid's broadphase, computed in that grid's local frame.
//!
//! # Features
//!
//! - Rigid body dynamics (static, kinematic, dynamic)
//! - Per-grid broadphase proxies with fattened AABBs
//! - Collision layers and one-directional mask filtering
//! - Ray casts offset per grid, with world-space hits sorted by distance
//! - Virtual controllers (mover, gravity, friction)
//! - Sleep management with per-body opt-out
//! - Authoritative replication snapshots (mass in grams on the wire)
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                  PhysicsWorld                      │
//! │  ┌──────────┐  ┌───────────────────┐  ┌────────┐ │
//! │  │  Bodies  │  │ BroadPhase per    │  │ Events │ │
//! │  │          │  │ (map, grid) pair  │  │        │ │
//! │  └──────────┘  └───────────────────┘  └────────┘ │
//! └───────────────────────────────────────────────────┘
//!                         │  PhysicsContext (transforms, grids)
//!                         ▼
//!               embedding engine systems
//! ```
//!
//! # Example
//!
//! ```ignore
//! use strata_physics::prelude::*;
//!
//! let mut world = PhysicsWorld::new(PhysicsConfig::default());
//!
//! let mut body = Body::dynamic(EntityUid(1)).with_mass(70.0);
//! body.add_fixture(
//!     Fixture::new(PhysShape::circle(0.35))
//!         .with_collision_layer(CollisionLayer::MOB)
//!         .with_collision_mask(CollisionLayer::STRUCTURE),
//! );
//! world.add_body(body, &ctx);
//!
//! world.step(1.0 / 60.0, &ctx);
//! for event in world.drain_events().events {
//!     // dispatch to interested systems
//! }
//! ```

pub mod body;
pub mod broadphase;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod fixture;
pub mod ids;
pub mod layers;
pub mod query;
pub mod shape;
pub mod state;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{Body, BodyStatus, BodyType};
    pub use crate::broadphase::{BroadPhase, ProxyId};
    pub use crate::config::PhysicsConfig;
    pub use crate::controller::{Controller, ControllerKind, ControllerState};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{EventCollector, PhysicsEvent};
    pub use crate::fixture::{Fixture, FixtureProxy, FixtureState};
    pub use crate::ids::{EntityUid, FixtureId, GridId, MapId};
    pub use crate::layers::CollisionLayer;
    pub use crate::query::{RayCastHit, RayCastOptions};
    pub use crate::shape::PhysShape;
    pub use crate::state::PhysicsState;
    pub use crate::world::{PhysicsContext, PhysicsWorld};
}

pub use prelude::*;
