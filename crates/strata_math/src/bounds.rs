//! Axis-aligned bounding boxes for spatial queries

use crate::vector::Vec2;

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Create an empty (inverted) AABB
    pub const EMPTY: Self = Self {
        min: Vec2::new(f32::MAX, f32::MAX),
        max: Vec2::new(f32::MIN, f32::MIN),
    };

    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Create from a set of points
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut aabb = Self::EMPTY;
        for &point in points {
            aabb = aabb.expand_to_include(point);
        }
        aabb
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Get the size (full extents)
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> f32 {
        let size = self.size();
        size.x * size.y
    }

    /// Check if the AABB is valid (min <= max, no NaN)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }

    /// Check if the AABB is empty (inverted or degenerate)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_to_include(self, point: Vec2) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Union of two AABBs
    #[inline]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Expand by a uniform amount in all directions
    #[inline]
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Translate by an offset
    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Check if a point is inside
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if another AABB is fully contained
    #[inline]
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Check if two AABBs intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
            && self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Distance along a ray to its first intersection with the AABB, if
    /// any. The ray is `origin + direction * t` for `t >= 0`; `direction`
    /// need not be normalized (the distance is in units of its length).
    pub fn intersects_ray(&self, origin: Vec2, direction: Vec2) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::MAX;

        for (o, d, min, max) in [
            (origin.x, direction.x, self.min.x, self.max.x),
            (origin.y, direction.y, self.min.y, self.max.y),
        ] {
            if d.abs() < 1e-9 {
                // Parallel to this slab; must already be inside it.
                if o < min || o > max {
                    return None;
                }
            } else {
                let inv = 1.0 / d;
                let (t1, t2) = ((min - o) * inv, (max - o) * inv);
                let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
                t_min = t_min.max(near);
                t_max = t_max.min(far);
                if t_min > t_max {
                    return None;
                }
            }
        }
        Some(t_min)
    }

    /// Get the closest point on the AABB to a given point
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Get the 4 corners of the AABB
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min.x, self.min.y),
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.max.x, self.max.y),
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Rotate around the origin by `angle` radians, returning the bounding
    /// box of the rotated corners
    pub fn rotated(&self, angle: f32) -> Self {
        let mut result = Self::EMPTY;
        for corner in self.corners() {
            result = result.expand_to_include(corner.rotated(angle));
        }
        result
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::new(Vec2::ZERO, Vec2::ONE);
        assert!(aabb.contains_point(Vec2::new(0.5, 0.5)));
        assert!(!aabb.contains_point(Vec2::new(1.5, 0.5)));
    }

    #[test]
    fn test_intersects() {
        let a = Aabb::new(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::new(Vec2::new(0.5, 0.5), Vec2::new(1.5, 1.5));
        let c = Aabb::new(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_union_and_translate() {
        let a = Aabb::new(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::new(Vec2::new(2.0, -1.0), Vec2::new(3.0, 0.5));
        let u = a.union(&b);
        assert_eq!(u.min, Vec2::new(0.0, -1.0));
        assert_eq!(u.max, Vec2::new(3.0, 1.0));

        let t = a.translated(Vec2::new(1.0, 1.0));
        assert_eq!(t.min, Vec2::ONE);
        assert_eq!(t.max, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_rotated_quarter_turn() {
        let aabb = Aabb::new(Vec2::new(-2.0, -1.0), Vec2::new(2.0, 1.0));
        let r = aabb.rotated(core::f32::consts::FRAC_PI_2);
        assert!((r.min.x - -1.0).abs() < 1e-5);
        assert!((r.min.y - -2.0).abs() < 1e-5);
        assert!((r.max.x - 1.0).abs() < 1e-5);
        assert!((r.max.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_intersection() {
        let aabb = Aabb::new(Vec2::new(4.0, -1.0), Vec2::new(6.0, 1.0));

        // Head-on hit from the left.
        let t = aabb.intersects_ray(Vec2::ZERO, Vec2::X).unwrap();
        assert!((t - 4.0).abs() < 1e-6);

        // Pointing away.
        assert!(aabb.intersects_ray(Vec2::ZERO, -Vec2::X).is_none());

        // Parallel miss above the box.
        assert!(aabb.intersects_ray(Vec2::new(0.0, 2.0), Vec2::X).is_none());

        // Origin inside hits at distance zero.
        let t = aabb.intersects_ray(Vec2::new(5.0, 0.0), Vec2::Y).unwrap();
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_empty_is_invalid() {
        assert!(Aabb::EMPTY.is_empty());
        assert!(!Aabb::EMPTY.is_valid());
        assert!(Aabb::new(Vec2::ZERO, Vec2::ONE).is_valid());
    }
}
