//! Geometric overlap predicates
//!
//! Pure functions over `Rect`/`Circle`. All tests are strict: shapes that only
//! touch along an edge or at a tangent point do not collide.

use crate::{Circle, Rect};

/// Axis-aligned rectangle overlap (open intervals)
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Circle overlap; tangent circles do not collide
#[inline]
pub fn circle_overlap(a: &Circle, b: &Circle) -> bool {
    distance(a.x, a.y, b.x, b.y) < a.r + b.r
}

/// Circle vs rectangle via the nearest point on the rectangle
///
/// Compares squared distances, so no square root is taken.
#[inline]
pub fn circle_rect_overlap(circle: &Circle, rect: &Rect) -> bool {
    let nearest_x = circle.x.clamp(rect.x, rect.x + rect.w);
    let nearest_y = circle.y.clamp(rect.y, rect.y + rect.h);
    let dx = circle.x - nearest_x;
    let dy = circle.y - nearest_y;
    dx * dx + dy * dy < circle.r * circle.r
}

/// Euclidean distance between two points
#[inline]
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x2 - x1).hypot(y2 - y1)
}
