//! Types, aliases and helper operations for doing math with `ultraviolet`.
pub use ultraviolet as uv;

/// 2D vector type used for all positions in the index.
pub type Vec2 = uv::DVec2;

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_sq(a: Vec2, b: Vec2) -> f64 {
    (b - a).mag_sq()
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (b - a).mag()
}

/// Round half away from zero, which is what the quadtree uses to halve node sides.
///
/// Node sides are always positive, so this matches rounding half up.
#[inline]
pub(crate) fn half_rounded(length: f64) -> f64 {
    (length / 2.0).round()
}
