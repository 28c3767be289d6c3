//! Identifier newtypes shared across the physics subsystem

use serde::{Deserialize, Serialize};

/// Identity of the entity owning a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityUid(pub u64);

impl std::fmt::Display for EntityUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity {}", self.0)
    }
}

/// Identifier of a map (one simulation space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub u32);

impl MapId {
    /// The map entities live on before being placed anywhere
    pub const NULLSPACE: Self = Self(0);
}

/// Identifier of a grid within a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridId(pub u32);

impl GridId {
    /// Sentinel for the map's own default frame (identity transform).
    /// Bodies off every grid register their proxies here.
    pub const INVALID: Self = Self(0);
}

/// Identifier of a fixture, unique within its owning body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FixtureId(pub u32);
