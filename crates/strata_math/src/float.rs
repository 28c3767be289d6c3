//! Scalar float helpers

/// Relative-tolerance float comparison.
///
/// Tolerance scales with the larger magnitude, with a small absolute floor
/// so values near zero still compare equal.
pub fn close_to(a: f32, b: f32) -> bool {
    let tolerance = (a.abs().max(b.abs()) * 1e-5).max(1e-5);
    (a - b).abs() <= tolerance
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
