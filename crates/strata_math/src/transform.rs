//! 2D rigid transforms (rotation + translation)

use crate::vector::Vec2;

/// A 2D rigid transform: counter-clockwise rotation followed by translation
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform2 {
    /// Translation component
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
}

impl Transform2 {
    /// The identity transform
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
    };

    /// Create from position and rotation
    #[inline]
    pub const fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Pure translation
    #[inline]
    pub const fn from_translation(position: Vec2) -> Self {
        Self::new(position, 0.0)
    }

    /// Pure rotation
    #[inline]
    pub const fn from_rotation(rotation: f32) -> Self {
        Self::new(Vec2::ZERO, rotation)
    }

    /// Transform a point (rotate, then translate)
    #[inline]
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        point.rotated(self.rotation) + self.position
    }

    /// Transform a direction (rotate only)
    #[inline]
    pub fn transform_vector(&self, vector: Vec2) -> Vec2 {
        vector.rotated(self.rotation)
    }

    /// The inverse transform
    pub fn inverse(&self) -> Self {
        Self {
            position: (-self.position).rotated(-self.rotation),
            rotation: -self.rotation,
        }
    }

    /// Compose two transforms: `self` applied after `other`
    pub fn compose(&self, other: &Transform2) -> Self {
        Self {
            position: self.transform_point(other.position),
            rotation: self.rotation + other.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    fn assert_vec_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_transform_point() {
        let xf = Transform2::new(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert_vec_close(xf.transform_point(Vec2::X), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let xf = Transform2::new(Vec2::new(3.0, -2.0), 0.7);
        let p = Vec2::new(1.5, 4.0);
        assert_vec_close(xf.inverse().transform_point(xf.transform_point(p)), p);
    }

    #[test]
    fn test_compose_matches_sequential_application() {
        let a = Transform2::new(Vec2::new(1.0, 2.0), 0.3);
        let b = Transform2::new(Vec2::new(-0.5, 0.5), -1.1);
        let p = Vec2::new(2.0, -1.0);
        assert_vec_close(
            a.compose(&b).transform_point(p),
            a.transform_point(b.transform_point(p)),
        );
    }
}
