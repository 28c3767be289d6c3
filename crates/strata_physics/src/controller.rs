//! Virtual controllers
//!
//! Controllers are per-body behaviors applied each tick before integration.
//! A body holds at most one controller of each kind.

use serde::{Deserialize, Serialize};
use strata_math::Vec2;

use crate::error::{PhysicsError, Result};
use crate::ids::EntityUid;

/// The closed set of controller kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerKind {
    /// Input-driven movement toward a target velocity
    Mover,
    /// Constant acceleration
    Gravity,
    /// Velocity decay when no other controller is driving the body
    Friction,
}

/// Per-kind controller state
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerState {
    Mover {
        /// Velocity the controller steers toward
        target_velocity: Vec2,
        /// How fast the body approaches the target (1/s)
        acceleration: f32,
    },
    Gravity {
        /// Acceleration applied every tick
        acceleration: Vec2,
    },
    Friction {
        /// Exponential decay rate (1/s)
        decay: f32,
    },
}

impl ControllerState {
    /// The kind tag for this state
    pub fn kind(&self) -> ControllerKind {
        match self {
            Self::Mover { .. } => ControllerKind::Mover,
            Self::Gravity { .. } => ControllerKind::Gravity,
            Self::Friction { .. } => ControllerKind::Friction,
        }
    }

    /// Default state for a kind
    pub fn default_for(kind: ControllerKind) -> Self {
        match kind {
            ControllerKind::Mover => Self::Mover {
                target_velocity: Vec2::ZERO,
                acceleration: 20.0,
            },
            ControllerKind::Gravity => Self::Gravity {
                acceleration: Vec2::ZERO,
            },
            ControllerKind::Friction => Self::Friction { decay: 0.0 },
        }
    }
}

/// A controller attached to a body
#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    /// Body this controller steers; cleared on detach
    pub owner: Option<EntityUid>,
    /// Kind-specific state
    pub state: ControllerState,
}

impl Controller {
    /// Create a detached controller
    pub fn new(state: ControllerState) -> Self {
        Self { owner: None, state }
    }

    /// The kind tag
    pub fn kind(&self) -> ControllerKind {
        self.state.kind()
    }

    /// Velocity contribution for this tick, given the current velocity
    pub fn velocity_change(&self, velocity: Vec2, dt: f32) -> Vec2 {
        match &self.state {
            ControllerState::Mover {
                target_velocity,
                acceleration,
            } => (*target_velocity - velocity) * (acceleration * dt).min(1.0),
            ControllerState::Gravity { acceleration } => *acceleration * dt,
            ControllerState::Friction { decay } => {
                velocity * -(dt * decay).clamp(0.0, 1.0)
            }
        }
    }

    /// Bring the controller to rest. Returns false for kinds that cannot be
    /// stopped (gravity keeps pulling).
    pub fn stop(&mut self) -> bool {
        match &mut self.state {
            ControllerState::Mover {
                target_velocity, ..
            } => {
                *target_velocity = Vec2::ZERO;
                true
            }
            ControllerState::Gravity { .. } => false,
            ControllerState::Friction { .. } => true,
        }
    }
}

/// The controllers attached to one body, at most one per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerSet {
    controllers: Vec<Controller>,
}

impl ControllerSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a controller. Fails if one of the same kind is already
    /// attached.
    pub fn add(&mut self, owner: EntityUid, state: ControllerState) -> Result<&mut Controller> {
        let kind = state.kind();
        if self.get(kind).is_some() {
            return Err(PhysicsError::ControllerExists(kind));
        }
        self.controllers.push(Controller {
            owner: Some(owner),
            state,
        });
        Ok(self.controllers.last_mut().unwrap())
    }

    /// Attach a controller, replacing and detaching any existing one of the
    /// same kind. Returns the replaced controller, if any.
    pub fn set(&mut self, owner: EntityUid, state: ControllerState) -> Option<Controller> {
        let kind = state.kind();
        let replaced = self.remove(kind);
        self.controllers.push(Controller {
            owner: Some(owner),
            state,
        });
        replaced
    }

    /// Get the controller of `kind`, creating a default one if absent.
    /// The bool reports whether it already existed.
    pub fn ensure(&mut self, owner: EntityUid, kind: ControllerKind) -> (&mut Controller, bool) {
        if let Some(index) = self.index_of(kind) {
            return (&mut self.controllers[index], true);
        }
        self.controllers.push(Controller {
            owner: Some(owner),
            state: ControllerState::default_for(kind),
        });
        (self.controllers.last_mut().unwrap(), false)
    }

    /// Detach and remove the controller of `kind`
    pub fn remove(&mut self, kind: ControllerKind) -> Option<Controller> {
        let index = self.index_of(kind)?;
        let mut controller = self.controllers.remove(index);
        controller.owner = None;
        Some(controller)
    }

    /// Detach and remove every controller
    pub fn remove_all(&mut self) {
        for controller in &mut self.controllers {
            controller.owner = None;
        }
        self.controllers.clear();
    }

    /// Stop every controller. All of them run; returns true only if every
    /// stop succeeded.
    pub fn stop_all(&mut self) -> bool {
        let mut all_stopped = true;
        for controller in &mut self.controllers {
            all_stopped &= controller.stop();
        }
        all_stopped
    }

    /// Get the controller of `kind`
    pub fn get(&self, kind: ControllerKind) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.kind() == kind)
    }

    /// Get the controller of `kind` mutably
    pub fn get_mut(&mut self, kind: ControllerKind) -> Option<&mut Controller> {
        self.controllers.iter_mut().find(|c| c.kind() == kind)
    }

    /// Iterate over attached controllers
    pub fn iter(&self) -> impl Iterator<Item = &Controller> {
        self.controllers.iter()
    }

    /// Number of attached controllers
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// True if no controllers are attached
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    fn index_of(&self, kind: ControllerKind) -> Option<usize> {
        self.controllers.iter().position(|c| c.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UID: EntityUid = EntityUid(1);

    #[test]
    fn test_add_rejects_duplicate_kind() {
        let mut set = ControllerSet::new();
        set.add(UID, ControllerState::default_for(ControllerKind::Mover))
            .unwrap();
        let err = set
            .add(UID, ControllerState::default_for(ControllerKind::Mover))
            .unwrap_err();
        assert!(matches!(
            err,
            PhysicsError::ControllerExists(ControllerKind::Mover)
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_replaces_and_detaches() {
        let mut set = ControllerSet::new();
        set.add(
            UID,
            ControllerState::Gravity {
                acceleration: Vec2::new(0.0, -9.8),
            },
        )
        .unwrap();

        let replaced = set
            .set(
                UID,
                ControllerState::Gravity {
                    acceleration: Vec2::new(0.0, -1.6),
                },
            )
            .unwrap();
        assert_eq!(replaced.owner, None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ensure_reports_preexistence() {
        let mut set = ControllerSet::new();
        let (_, existed) = set.ensure(UID, ControllerKind::Friction);
        assert!(!existed);
        let (_, existed) = set.ensure(UID, ControllerKind::Friction);
        assert!(existed);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_detaches() {
        let mut set = ControllerSet::new();
        set.add(UID, ControllerState::default_for(ControllerKind::Mover))
            .unwrap();
        let removed = set.remove(ControllerKind::Mover).unwrap();
        assert_eq!(removed.owner, None);
        assert!(set.remove(ControllerKind::Mover).is_none());
    }

    #[test]
    fn test_stop_all_does_not_short_circuit() {
        let mut set = ControllerSet::new();
        set.add(
            UID,
            ControllerState::Gravity {
                acceleration: Vec2::new(0.0, -9.8),
            },
        )
        .unwrap();
        set.add(
            UID,
            ControllerState::Mover {
                target_velocity: Vec2::X,
                acceleration: 20.0,
            },
        )
        .unwrap();

        // Gravity cannot stop, but the mover after it must still be stopped.
        assert!(!set.stop_all());
        match &set.get(ControllerKind::Mover).unwrap().state {
            ControllerState::Mover {
                target_velocity, ..
            } => assert_eq!(*target_velocity, Vec2::ZERO),
            _ => unreachable!(),
        }
    }
}
