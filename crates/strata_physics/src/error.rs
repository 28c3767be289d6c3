//! Error types for the physics system

use thiserror::Error;

use crate::controller::ControllerKind;
use crate::ids::{EntityUid, FixtureId};

/// Physics system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Body not found in the physics world
    #[error("Physics body not found: {0:?}")]
    BodyNotFound(EntityUid),

    /// Fixture not found on a body
    #[error("Fixture not found: {0:?} on {1:?}")]
    FixtureNotFound(EntityUid, FixtureId),

    /// A controller of this kind is already attached
    #[error("Controller already attached: {0:?}")]
    ControllerExists(ControllerKind),

    /// Invalid collision shape
    #[error("Invalid collision shape: {0}")]
    InvalidShape(String),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
