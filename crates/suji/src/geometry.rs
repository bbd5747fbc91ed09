//! Geometric primitives shared by the segment fitter and the polyline
//! simplifier.
//!
//! All functions carry degenerate values through instead of masking them:
//! the slope of two coincident points is NaN, a vertical line has an
//! infinite slope, and projections onto a degenerate line are NaN pairs.
//! Downstream comparisons are written so that NaN falls into the
//! conservative branch.

use crate::types::Point;

/// Absolute tolerance for fuzzy floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Whether two floats are equal within [`EPSILON`].
#[must_use]
pub fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Whether both coordinates of two points are fuzzy-equal.
#[must_use]
pub fn points_equal(a: Point, b: Point) -> bool {
    fuzzy_eq(a.x, b.x) && fuzzy_eq(a.y, b.y)
}

/// Slope of the line through `a` and `b`.
///
/// NaN when the points coincide, positive or negative infinity when the
/// line is vertical (`a.x == b.x`).
#[must_use]
pub fn slope(a: Point, b: Point) -> f64 {
    if points_equal(a, b) {
        f64::NAN
    } else {
        (b.y - a.y) / (b.x - a.x)
    }
}

/// Y-intercept of the line with the given slope through `a`; for a vertical
/// line the offset is the x-intercept instead.
#[must_use]
pub fn line_offset(a: Point, slope: f64) -> f64 {
    if slope.is_infinite() {
        a.x
    } else {
        a.x.mul_add(-slope, a.y)
    }
}

/// Project `point` onto the line through `a` and `b`.
///
/// Returns a NaN pair when `a` and `b` coincide; returns `a` or `b`
/// unchanged when `point` fuzzy-equals either of them.
#[must_use]
pub fn project_onto_line(point: Point, a: Point, b: Point) -> Point {
    if points_equal(a, b) {
        return Point::new(f64::NAN, f64::NAN);
    }
    if points_equal(point, a) {
        return a;
    }
    if points_equal(point, b) {
        return b;
    }

    let slope = slope(a, b);
    project_with_slope(point, slope, line_offset(a, slope))
}

/// Project `point` onto the line given as slope and offset.
///
/// For finite slopes the offset is the y-intercept; for an infinite slope
/// it is the x-intercept.
#[must_use]
pub fn project_with_slope(point: Point, slope: f64, offset: f64) -> Point {
    if fuzzy_eq(slope, 0.0) {
        return Point::new(point.x, offset);
    }
    if slope.is_infinite() {
        return Point::new(offset, point.y);
    }
    let counter_slope = -1.0 / slope;
    let counter_offset = point.x.mul_add(-counter_slope, point.y);
    let x = (offset - counter_offset) / (counter_slope - slope);
    let y = counter_slope.mul_add(x, counter_offset);
    Point::new(x, y)
}

/// Squared distance from `point` to the segment between `a` and `b`.
///
/// When the projection of `point` falls strictly between the segment's x
/// extremes the perpendicular distance is used, otherwise the distance to
/// the nearer endpoint.
#[must_use]
pub fn squared_distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let slope = slope(a, b);
    let projected = project_with_slope(point, slope, line_offset(a, slope));
    let to_line = point.distance_squared(projected);

    if projected.x > a.x.min(b.x) && projected.x < a.x.max(b.x) {
        to_line
    } else {
        point.distance_squared(a).min(point.distance_squared(b))
    }
}
