//! Robust 2D segment fitting with random sample consensus.
//!
//! Each iteration hypothesises a line through two randomly drawn points,
//! scores it by the capped sum of squared distances over a random sample of
//! the input (drawn without replacement), and keeps the hypothesis with the
//! smallest sum. The fitted segment spans the extreme projected inliers
//! along x.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::diagnostics::WarningSink;
use crate::geometry::{self, line_offset, project_with_slope, squared_distance_to_segment};
use crate::types::Point;

/// A fitted 2D segment.
///
/// Default-constructed segments are invalid placeholders; check
/// [`is_valid`](Self::is_valid) before consuming the coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2D {
    /// Start of the segment (smallest x among the fitted points).
    pub begin: Point,
    /// End of the segment (largest x among the fitted points).
    pub end: Point,
    /// Mean squared distance of the sampled points to the fitted line.
    pub mse: f64,
    /// Whether this segment holds a real estimate.
    pub is_valid: bool,
}

impl Segment2D {
    /// Create a valid segment.
    #[must_use]
    pub const fn new(begin: Point, end: Point, mse: f64) -> Self {
        Self {
            begin,
            end,
            mse,
            is_valid: true,
        }
    }

    const fn invalid() -> Self {
        Self {
            begin: Point::new(0.0, 0.0),
            end: Point::new(0.0, 0.0),
            mse: 0.0,
            is_valid: false,
        }
    }
}

impl Default for Segment2D {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Configuration for [`fit_segment`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentFitConfig {
    /// Number of RANSAC iterations. `0` is coerced to 1 with a warning.
    pub iterations: usize,

    /// Number of points sampled to score each hypothesis.
    /// `0` means all points.
    pub samples: usize,

    /// Maximum distance from the line for a sampled point to count as an
    /// inlier; contributions beyond it are capped. `0` means every sampled
    /// point is an inlier.
    pub max_inlier_distance: f64,

    /// Random seed for reproducibility. `0` derives a seed from the system
    /// clock (non-deterministic).
    pub seed: u64,
}

impl SegmentFitConfig {
    /// Create a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the iteration count.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder-style setter for the sample count.
    #[must_use]
    pub const fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Builder-style setter for the inlier distance threshold.
    #[must_use]
    pub const fn with_max_inlier_distance(mut self, distance: f64) -> Self {
        self.max_inlier_distance = distance;
        self
    }

    /// Builder-style setter for the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SegmentFitConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            samples: 0,
            max_inlier_distance: 0.0,
            seed: 0,
        }
    }
}

/// Linear congruential generator for deterministic index sampling.
struct SampleRng {
    state: u64,
}

impl SampleRng {
    #[allow(clippy::cast_possible_truncation)]
    fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_or(0x5851_f42d, |d| d.as_nanos() as u64)
            } else {
                seed
            },
        }
    }

    fn next(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes.
        self.state = self.state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        self.state
    }

    /// Uniform index in `[0, bound)`.
    #[allow(clippy::cast_possible_truncation)]
    fn index(&mut self, bound: usize) -> usize {
        (self.next() % (bound as u64)) as usize
    }
}

/// Fit a segment to a set of points with RANSAC.
///
/// Generic over the point type through a coordinate getter, like
/// [`simplify_polyline`](crate::simplify_polyline).
///
/// Degenerate inputs produce an invalid segment (fewer than two points) or
/// a coerced parameter (zero iterations), each reported through `sink`.
#[allow(clippy::cast_precision_loss)]
pub fn fit_segment<T, F, S>(
    points: &[T],
    coords: F,
    config: &SegmentFitConfig,
    sink: &mut S,
) -> Segment2D
where
    F: Fn(&T) -> Point,
    S: WarningSink,
{
    let n_points = points.len();
    if n_points < 2 {
        sink.warn("not enough points to fit a segment");
        return Segment2D::default();
    }

    let mut iterations = config.iterations;
    if iterations == 0 {
        sink.warn("segment fit iteration count is 0, defaulting to 1; the estimate is likely inaccurate");
        iterations = 1;
    }

    let n_samples = if config.samples == 0 {
        n_points
    } else {
        config.samples.min(n_points)
    };

    let max_squared = if config.max_inlier_distance == 0.0 {
        f64::INFINITY
    } else {
        config.max_inlier_distance * config.max_inlier_distance
    };

    let mut rng = SampleRng::new(config.seed);
    let mut best = Segment2D::default();
    let mut smallest_sum = f64::INFINITY;

    for _ in 0..iterations {
        let index_a = rng.index(n_points);
        let mut index_b = rng.index(n_points);
        while index_b == index_a {
            index_b = rng.index(n_points);
        }

        let point_a = coords(&points[index_a]);
        let point_b = coords(&points[index_b]);

        let slope = geometry::slope(point_a, point_b);
        if slope.is_nan() {
            continue;
        }
        let offset = line_offset(point_a, slope);

        // The hypothesis points plus the projections of every sampled
        // inlier; the fitted segment spans their x extremes.
        let mut candidates = Vec::with_capacity(n_samples + 2);
        candidates.push(point_a);
        candidates.push(point_b);

        // Sample without replacement (Robert Floyd), aborting early once
        // the running sum cannot beat the best hypothesis.
        let mut sum_squared = 0.0;
        let mut drawn = n_points - n_samples;
        let mut was_sampled = vec![false; n_points];
        while drawn < n_points && sum_squared < smallest_sum {
            let mut i = rng.index(drawn + 1);
            if was_sampled[i] {
                i = drawn;
            }
            was_sampled[i] = true;
            drawn += 1;

            let point = coords(&points[i]);
            let projected = project_with_slope(point, slope, offset);
            let squared = point.distance_squared(projected);

            sum_squared += squared.min(max_squared);
            if squared <= max_squared {
                candidates.push(projected);
            }
        }

        if sum_squared >= smallest_sum {
            continue;
        }
        smallest_sum = sum_squared;

        // First minimum and last maximum by x.
        let mut begin = candidates[0];
        let mut end = candidates[0];
        for &candidate in &candidates[1..] {
            if candidate.x < begin.x {
                begin = candidate;
            }
            if candidate.x >= end.x {
                end = candidate;
            }
        }

        best = Segment2D::new(begin, end, sum_squared / n_samples as f64);
    }

    best
}

/// Partition `points` in place so that inliers of `segment` come first.
///
/// Returns the number of inliers. A threshold of `0` keeps every point; a
/// degenerate segment (coincident endpoints) keeps none. The relative
/// order within each side is unspecified.
pub fn partition_inliers<T, F>(
    points: &mut [T],
    coords: F,
    segment: &Segment2D,
    max_inlier_distance: f64,
) -> usize
where
    F: Fn(&T) -> Point,
{
    if max_inlier_distance == 0.0 {
        return points.len();
    }
    if geometry::slope(segment.begin, segment.end).is_nan() {
        return 0;
    }

    let max_squared = max_inlier_distance * max_inlier_distance;
    let mut first = 0;
    let mut last = points.len();
    while first < last {
        let distance = squared_distance_to_segment(coords(&points[first]), segment.begin, segment.end);
        if distance < max_squared {
            first += 1;
        } else {
            last -= 1;
            points.swap(first, last);
        }
    }
    first
}
