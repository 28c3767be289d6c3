//! Physics change events
//!
//! Mutations record events synchronously into an [`EventCollector`]; the
//! simulation loop drains them once per tick and dispatches to whatever
//! systems care. There is no global event bus.

use crate::ids::{EntityUid, FixtureId};

/// A change notification produced by a body or world mutation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// Collision participation toggled
    CollisionChange { owner: EntityUid, can_collide: bool },
    /// Something affecting broadphase membership changed
    PhysicsUpdate { owner: EntityUid },
    /// A fixture was added, removed, or reshaped
    FixtureUpdate { owner: EntityUid, fixture: FixtureId },
    /// The body transitioned to or from Static
    AnchoredChanged { owner: EntityUid, anchored: bool },
    /// The body woke up
    Wake { owner: EntityUid },
    /// The body went to sleep
    Sleep { owner: EntityUid },
    /// The body needs replication
    Dirty { owner: EntityUid },
}

impl PhysicsEvent {
    /// The entity this event concerns
    pub fn owner(&self) -> EntityUid {
        match *self {
            Self::CollisionChange { owner, .. }
            | Self::PhysicsUpdate { owner }
            | Self::FixtureUpdate { owner, .. }
            | Self::AnchoredChanged { owner, .. }
            | Self::Wake { owner }
            | Self::Sleep { owner }
            | Self::Dirty { owner } => owner,
        }
    }
}

/// Buffer of events collected during a tick
#[derive(Debug, Default)]
pub struct EventCollector {
    /// Events in emission order
    pub events: Vec<PhysicsEvent>,
}

impl EventCollector {
    /// Create a new event collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event
    pub fn push(&mut self, event: PhysicsEvent) {
        self.events.push(event);
    }

    /// Clear all collected events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of collected events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing was collected
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Wake transitions
    pub fn wakes(&self) -> impl Iterator<Item = EntityUid> + '_ {
        self.events.iter().filter_map(|e| match e {
            PhysicsEvent::Wake { owner } => Some(*owner),
            _ => None,
        })
    }

    /// Sleep transitions
    pub fn sleeps(&self) -> impl Iterator<Item = EntityUid> + '_ {
        self.events.iter().filter_map(|e| match e {
            PhysicsEvent::Sleep { owner } => Some(*owner),
            _ => None,
        })
    }

    /// Bodies needing replication
    pub fn dirty_bodies(&self) -> impl Iterator<Item = EntityUid> + '_ {
        self.events.iter().filter_map(|e| match e {
            PhysicsEvent::Dirty { owner } => Some(*owner),
            _ => None,
        })
    }

    /// Anchoring transitions
    pub fn anchor_changes(&self) -> impl Iterator<Item = (EntityUid, bool)> + '_ {
        self.events.iter().filter_map(|e| match e {
            PhysicsEvent::AnchoredChanged { owner, anchored } => Some((*owner, *anchored)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_iterators() {
        let uid = EntityUid(7);
        let mut collector = EventCollector::new();
        collector.push(PhysicsEvent::Wake { owner: uid });
        collector.push(PhysicsEvent::Dirty { owner: uid });
        collector.push(PhysicsEvent::Sleep { owner: uid });

        assert_eq!(collector.wakes().count(), 1);
        assert_eq!(collector.sleeps().count(), 1);
        assert_eq!(collector.dirty_bodies().collect::<Vec<_>>(), vec![uid]);

        collector.clear();
        assert!(collector.is_empty());
    }
}
