//! Shared types for the skeleton tracing pipeline.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
///
/// Used by the post-processing numerics (segment fitting, polyline
/// simplification); traced polylines themselves carry integer pixel
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// An ordered sequence of `(row, column)` pixel coordinates tracing one
/// stroke of the skeleton.
///
/// Polylines produced by [`trace_polylines`](crate::trace_polylines) always
/// have at least two points; their endpoints are where merging with
/// neighbouring strokes happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polyline(Vec<(u32, u32)>);

impl Polyline {
    /// Create a new polyline from a vector of `(row, column)` pairs.
    #[must_use]
    pub const fn new(points: Vec<(u32, u32)>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<(u32, u32)> {
        self.0.first().copied()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<(u32, u32)> {
        self.0.last().copied()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[(u32, u32)] {
        &self.0
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<(u32, u32)> {
        self.0
    }
}

/// Configuration for the skeleton tracer.
///
/// All parameters have defaults matching the common case: thin the input
/// first, recurse as deep as the minimum section size allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Size of the smallest image sections that segments are fitted to.
    ///
    /// Values below 3 are raised to 3. Smaller sections give a higher
    /// resolution and potentially noisier polylines.
    pub min_section_size: usize,

    /// Maximum number of recursive splits. `0` means unlimited: the
    /// recursion is bounded by `min_section_size` alone.
    pub max_recursions: usize,

    /// Thin the image down to a one-pixel-wide skeleton before tracing.
    ///
    /// Not needed when the input already has single-pixel strokes.
    pub thinning: bool,
}

impl TraceConfig {
    /// Default minimum section size.
    pub const DEFAULT_MIN_SECTION_SIZE: usize = 3;
    /// Default recursion limit (unlimited).
    pub const DEFAULT_MAX_RECURSIONS: usize = 0;
    /// Default thinning state.
    pub const DEFAULT_THINNING: bool = true;
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            min_section_size: Self::DEFAULT_MIN_SECTION_SIZE,
            max_recursions: Self::DEFAULT_MAX_RECURSIONS,
            thinning: Self::DEFAULT_THINNING,
        }
    }
}

/// Errors produced when constructing a bit image from caller data.
///
/// These are precondition violations, not tracing failures: degenerate but
/// well-formed inputs (an image smaller than 3x3, an all-off image) trace to
/// an empty polyline set instead.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// `rows * cols` does not fit in `usize`.
    #[error("image dimensions {rows}x{cols} overflow the addressable size")]
    SizeOverflow {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// The provided pixel data does not contain `rows * cols` elements.
    #[error("image data length mismatch: expected {expected} pixels, got {actual}")]
    SizeMismatch {
        /// Expected element count (`rows * cols`).
        expected: usize,
        /// Actual element count.
        actual: usize,
    },
}
