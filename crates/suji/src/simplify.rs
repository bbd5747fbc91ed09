//! Polyline simplification with the Ramer-Douglas-Peucker algorithm.
//!
//! Works in place over a mutable slice: the kept points are compacted to
//! the front in their original relative order, and the returned index
//! splits kept from discarded (the order of discarded points is
//! unspecified). Generic over the point type through a coordinate getter,
//! so it applies to traced `(row, column)` polylines and caller point types
//! alike.

use crate::geometry::squared_distance_to_segment;
use crate::types::Point;

/// Simplify a polyline in place, discarding points closer than `epsilon`
/// to the local simplified segment.
///
/// Returns the number of kept points; `points[..kept]` is the simplified
/// polyline in original order. The first and last point always survive.
///
/// Inputs with fewer than three points, coincident first and last points,
/// or a non-positive `epsilon` are kept whole.
pub fn simplify_polyline<T, F>(points: &mut [T], coords: F, epsilon: f64) -> usize
where
    T: PartialEq,
    F: Fn(&T) -> Point + Copy,
{
    if points.is_empty() {
        return 0;
    }
    rdp(points, 0, points.len(), coords, epsilon)
}

/// Recursive step over the half-open range `[first, last)`.
///
/// Returns the end of the kept prefix within the range.
fn rdp<T, F>(points: &mut [T], first: usize, last: usize, coords: F, epsilon: f64) -> usize
where
    T: PartialEq,
    F: Fn(&T) -> Point + Copy,
{
    let a = first;
    let b = last - 1;

    if b - a < 2 || points[a] == points[b] || epsilon <= 0.0 {
        return last;
    }

    let start = coords(&points[a]);
    let end = coords(&points[b]);

    // First of the equally-furthest interior points wins.
    let mut furthest = a + 1;
    let mut max_squared = squared_distance_to_segment(coords(&points[a + 1]), start, end);
    for i in (a + 2)..b {
        let squared = squared_distance_to_segment(coords(&points[i]), start, end);
        if squared > max_squared {
            max_squared = squared;
            furthest = i;
        }
    }

    if max_squared > epsilon * epsilon {
        // Simplify the right half before the left so the furthest point is
        // not moved while it is still a range boundary.
        let right_kept = rdp(points, furthest, b + 1, coords, epsilon);
        let mut kept = rdp(points, a, furthest + 1, coords, epsilon);

        // Compact the kept right half directly behind the kept left half,
        // preserving relative order.
        let mut pt = furthest + 1;
        while pt != right_kept {
            points.swap(kept, pt);
            kept += 1;
            pt += 1;
        }
        kept
    } else {
        // Nothing sticks out: keep only the range endpoints.
        points.swap(b, a + 1);
        a + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(p: &(f64, f64)) -> Point {
        Point::new(p.0, p.1)
    }

    #[test]
    fn short_inputs_are_kept_whole() {
        let mut points = [(0.0, 0.0), (5.0, 5.0)];
        assert_eq!(simplify_polyline(&mut points, xy, 1.0), 2);

        let mut single = [(1.0, 1.0)];
        assert_eq!(simplify_polyline(&mut single, xy, 1.0), 1);

        let mut empty: [(f64, f64); 0] = [];
        assert_eq!(simplify_polyline(&mut empty, xy, 1.0), 0);
    }

    #[test]
    fn non_positive_epsilon_keeps_everything() {
        let mut points = [(0.0, 0.0), (1.0, 0.1), (2.0, 0.0), (3.0, 0.2), (4.0, 0.0)];
        assert_eq!(simplify_polyline(&mut points, xy, 0.0), 5);
        assert_eq!(simplify_polyline(&mut points, xy, -1.0), 5);
    }

    #[test]
    fn coincident_endpoints_keep_everything() {
        let mut points = [(0.0, 0.0), (1.0, 5.0), (2.0, 0.0), (0.0, 0.0)];
        assert_eq!(simplify_polyline(&mut points, xy, 1.0), 4);
    }

    #[test]
    fn collinear_points_collapse_to_endpoints() {
        let mut points = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)];
        let kept = simplify_polyline(&mut points, xy, 0.1);
        assert_eq!(kept, 2);
        assert_eq!(&points[..kept], &[(0.0, 0.0), (4.0, 4.0)]);
    }

    #[test]
    fn zigzag_peaks_are_retained() {
        let mut points = [(0.0, 0.0), (1.0, 10.0), (2.0, 0.0), (3.0, 10.0), (4.0, 0.0)];
        let kept = simplify_polyline(&mut points, xy, 1.0);
        assert_eq!(kept, 5);
        assert_eq!(
            &points[..kept],
            &[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0), (3.0, 10.0), (4.0, 0.0)],
        );
    }

    #[test]
    fn large_epsilon_collapses_zigzag() {
        let mut points = [(0.0, 0.0), (1.0, 10.0), (2.0, 0.0), (3.0, 10.0), (4.0, 0.0)];
        let kept = simplify_polyline(&mut points, xy, 50.0);
        assert_eq!(kept, 2);
        assert_eq!(&points[..kept], &[(0.0, 0.0), (4.0, 0.0)]);
    }

    #[test]
    fn moderate_epsilon_keeps_dominant_peak() {
        // The first peak (distance 10 from the base chord) survives; within
        // the chord from that peak to the end the remaining points stay
        // under the threshold and are dropped.
        let mut points = [(0.0, 0.0), (1.0, 10.0), (2.0, 0.0), (3.0, 10.0), (4.0, 0.0)];
        let kept = simplify_polyline(&mut points, xy, 5.0);
        assert_eq!(kept, 3);
        assert_eq!(&points[..kept], &[(0.0, 0.0), (1.0, 10.0), (4.0, 0.0)]);
    }

    #[test]
    fn kept_prefix_preserves_original_order() {
        let mut points = [
            (0.0, 0.0),
            (2.0, 5.0),
            (4.0, 0.0),
            (6.0, 5.0),
            (8.0, 0.0),
        ];
        let kept = simplify_polyline(&mut points, xy, 1.0);
        assert_eq!(kept, 5);
        let xs: Vec<f64> = points[..kept].iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn simplification_is_idempotent() {
        let mut points = [
            (0.0, 0.0),
            (1.0, 0.2),
            (2.0, 7.0),
            (3.0, 0.1),
            (4.0, 0.0),
            (5.0, 6.0),
            (6.0, 0.0),
        ];
        let kept = simplify_polyline(&mut points, xy, 1.0);
        let first_pass: Vec<_> = points[..kept].to_vec();

        let mut again = first_pass.clone();
        let kept_again = simplify_polyline(&mut again, xy, 1.0);
        assert_eq!(&again[..kept_again], first_pass.as_slice());
    }

    #[test]
    fn works_on_integer_pixel_pairs() {
        let mut points: Vec<(u32, u32)> = vec![(0, 0), (1, 1), (2, 2), (3, 3)];
        let kept = simplify_polyline(
            &mut points,
            |&(r, c)| Point::new(f64::from(r), f64::from(c)),
            0.5,
        );
        assert_eq!(kept, 2);
        assert_eq!(&points[..kept], &[(0, 0), (3, 3)]);
    }
}
