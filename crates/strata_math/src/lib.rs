//! Strata Math - 2D math primitives
//!
//! Vectors, bounding boxes and rigid transforms for the simulation layer.
//! Everything here is plain-old-data with value semantics; serde support is
//! behind the `serde` feature.

pub mod bounds;
pub mod float;
pub mod transform;
pub mod vector;

pub mod prelude {
    //! Common imports for math functionality
    pub use crate::bounds::Aabb;
    pub use crate::float::{close_to, lerp};
    pub use crate::transform::Transform2;
    pub use crate::vector::Vec2;
}

pub use prelude::*;
