//! Collision layers and filtering

use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A collision bitmask. Fixtures carry one as their layer (what they are)
/// and one as their mask (what they collide with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Collides with nothing / belongs to nothing
    pub const NONE: Self = Self(0);
    /// All bits set
    pub const ALL: Self = Self(u32::MAX);

    /// Walls and other fixed obstacles
    pub const STRUCTURE: Self = Self(1 << 0);
    /// Mobs and other moving entities
    pub const MOB: Self = Self(1 << 1);
    /// Items lying in the world
    pub const ITEM: Self = Self(1 << 2);
    /// Projectiles in flight
    pub const PROJECTILE: Self = Self(1 << 3);

    /// Create from a raw bitmask
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// True if no bits are set
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if any bit overlaps with `other`
    #[inline]
    pub fn intersects(&self, other: CollisionLayer) -> bool {
        self.0 & other.0 != 0
    }

    /// True if every bit of `other` is set in `self`
    #[inline]
    pub fn contains(&self, other: CollisionLayer) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CollisionLayer {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CollisionLayer {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CollisionLayer {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Broadphase collision filter: `a` notices `b` when a's mask overlaps b's
/// layer. The relation is deliberately one-directional.
#[inline]
pub fn should_collide(mask: CollisionLayer, layer: CollisionLayer) -> bool {
    mask.intersects(layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_algebra() {
        let combined = CollisionLayer::MOB | CollisionLayer::ITEM;
        assert!(combined.intersects(CollisionLayer::MOB));
        assert!(combined.contains(CollisionLayer::ITEM));
        assert!(!combined.intersects(CollisionLayer::PROJECTILE));
    }

    #[test]
    fn test_should_collide_is_one_directional() {
        // Projectiles hit mobs, but a mob mask ignoring projectiles does not
        // notice them back.
        assert!(should_collide(CollisionLayer::MOB, CollisionLayer::MOB));
        assert!(!should_collide(CollisionLayer::STRUCTURE, CollisionLayer::ITEM));
    }
}
