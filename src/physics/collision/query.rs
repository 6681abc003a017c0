//! Exact intersection tests between circular bodies and points.

use crate::{math as m, physics::Body};

/// Check whether two bodies' circles touch or overlap.
///
/// Touching counts: bodies exactly `a.radius + b.radius` apart are in contact.
#[inline]
pub fn circles_touch(a: &Body, b: &Body) -> bool {
    m::distance(a.position, b.position) <= a.radius + b.radius
}

/// Check whether a point is inside a body's circle, boundary included.
#[inline]
pub fn point_in_circle(point: m::Vec2, body: &Body) -> bool {
    m::distance(point, body.position) <= body.radius
}
