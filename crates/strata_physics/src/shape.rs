//! Collision shapes

use serde::{Deserialize, Serialize};
use strata_math::{Aabb, Vec2};

use crate::error::{PhysicsError, Result};

/// A collision shape in body-local coordinates.
///
/// Shapes are plain data owned by exactly one fixture; every consumer
/// dispatches over the variants with `match`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysShape {
    /// An axis-aligned box in body space
    Aabb { bounds: Aabb },
    /// A circle with an offset from the body origin
    Circle { offset: Vec2, radius: f32 },
    /// A convex polygon
    Polygon { vertices: Vec<Vec2> },
    /// An open chain of line segments; each segment is a broadphase child
    Chain { vertices: Vec<Vec2> },
}

impl PhysShape {
    /// A centered unit box
    pub fn unit_box() -> Self {
        Self::Aabb {
            bounds: Aabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(0.5)),
        }
    }

    /// A circle centered on the body origin
    pub fn circle(radius: f32) -> Self {
        Self::Circle {
            offset: Vec2::ZERO,
            radius,
        }
    }

    /// Number of broadphase children this shape occupies
    pub fn child_count(&self) -> usize {
        match self {
            Self::Aabb { .. } | Self::Circle { .. } | Self::Polygon { .. } => 1,
            Self::Chain { vertices } => vertices.len().saturating_sub(1),
        }
    }

    /// Bounding box of the shape rotated by `angle` radians around the body
    /// origin, in the rotated frame's axes
    pub fn calculate_local_bounds(&self, angle: f32) -> Aabb {
        match self {
            Self::Aabb { bounds } => bounds.rotated(angle),
            Self::Circle { offset, radius } => {
                Aabb::from_center_half_extents(offset.rotated(angle), Vec2::splat(*radius))
            }
            Self::Polygon { vertices } | Self::Chain { vertices } => {
                let mut aabb = Aabb::EMPTY;
                for v in vertices {
                    aabb = aabb.expand_to_include(v.rotated(angle));
                }
                aabb
            }
        }
    }

    /// Re-validate a shape received from the network
    pub fn apply_state(&self) -> Result<()> {
        match self {
            Self::Aabb { bounds } => {
                if !bounds.is_valid() {
                    return Err(PhysicsError::InvalidShape(format!(
                        "degenerate aabb: {bounds:?}"
                    )));
                }
            }
            Self::Circle { offset, radius } => {
                if !radius.is_finite() || *radius <= 0.0 || !offset.is_finite() {
                    return Err(PhysicsError::InvalidShape(format!(
                        "bad circle: offset {offset:?}, radius {radius}"
                    )));
                }
            }
            Self::Polygon { vertices } => {
                if vertices.len() < 3 || vertices.iter().any(|v| !v.is_finite()) {
                    return Err(PhysicsError::InvalidShape(format!(
                        "bad polygon with {} vertices",
                        vertices.len()
                    )));
                }
            }
            Self::Chain { vertices } => {
                if vertices.len() < 2 || vertices.iter().any(|v| !v.is_finite()) {
                    return Err(PhysicsError::InvalidShape(format!(
                        "bad chain with {} vertices",
                        vertices.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f32::consts::FRAC_PI_2;

    #[test]
    fn test_box_bounds_quarter_turn() {
        let shape = PhysShape::Aabb {
            bounds: Aabb::new(Vec2::new(-2.0, -0.5), Vec2::new(2.0, 0.5)),
        };
        let bounds = shape.calculate_local_bounds(FRAC_PI_2);
        assert_relative_eq!(bounds.min.x, -0.5, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_circle_bounds_follow_offset() {
        let shape = PhysShape::Circle {
            offset: Vec2::new(1.0, 0.0),
            radius: 0.5,
        };
        let bounds = shape.calculate_local_bounds(FRAC_PI_2);
        assert_relative_eq!(bounds.center().y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(bounds.half_extents().x, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_chain_child_count() {
        let chain = PhysShape::Chain {
            vertices: vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)],
        };
        assert_eq!(chain.child_count(), 2);
        assert_eq!(PhysShape::circle(1.0).child_count(), 1);
    }

    #[test]
    fn test_apply_state_rejects_bad_shapes() {
        assert!(PhysShape::circle(-1.0).apply_state().is_err());
        assert!(PhysShape::Polygon {
            vertices: vec![Vec2::ZERO, Vec2::X]
        }
        .apply_state()
        .is_err());
        assert!(PhysShape::unit_box().apply_state().is_ok());
    }
}
