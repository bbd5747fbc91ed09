//! suji: skeleton tracing for binary raster images (sans-IO).
//!
//! Turns a grid of on/off pixels into a set of polylines tracing the
//! topological skeleton of the on regions:
//!
//! 1. Build a [`BitImage`] from caller data and a pixel predicate.
//! 2. Optionally thin the on regions to one-pixel strokes ([`thin`]).
//! 3. Recursively split the image along the sparsest central row or
//!    column, fit segments in the leaf sections, and merge strokes that
//!    cross split boundaries.
//! 4. Return polylines as `(row, column)` pixel sequences.
//!
//! The crate has **no I/O dependencies** -- it operates on in-memory
//! slices and returns structured data. Diagnostics about degenerate
//! inputs go through a caller-chosen [`WarningSink`].
//!
//! Post-processing numerics for the traced polylines live alongside the
//! tracer: a Ramer-Douglas-Peucker simplifier ([`simplify_polyline`]) and
//! a RANSAC segment fitter ([`fit_segment`]), both generic over the point
//! type through a coordinate getter.

pub mod bitimage;
pub mod diagnostics;
pub mod geometry;
mod merge;
pub mod ransac;
pub mod simplify;
pub mod thin;
mod trace;
pub mod types;

pub use bitimage::BitImage;
pub use diagnostics::{LogSink, NullSink, WarningSink};
pub use ransac::{Segment2D, SegmentFitConfig, fit_segment, partition_inliers};
pub use simplify::simplify_polyline;
pub use thin::thin;
pub use types::{Point, Polyline, TraceConfig, TraceError};

/// Smallest image the tracer accepts in either dimension.
const MIN_IMAGE_SIZE: usize = 3;

/// Trace the skeleton of `data` into polylines.
///
/// `is_on` classifies each element of `data` (given in row-major order) as
/// an on or off pixel; the pixel representation is entirely the caller's.
/// Images smaller than 3x3 produce an empty result and a warning through
/// `sink`, as does an image without on pixels (silently).
///
/// The returned polylines each hold at least two `(row, column)` points;
/// their order reflects the merge order of the recursion and carries no
/// stronger guarantee.
///
/// # Errors
///
/// Returns [`TraceError`] when `data.len()` is not `rows * cols` or the
/// pixel count overflows.
pub fn trace_polylines<T, P, S>(
    data: &[T],
    rows: usize,
    cols: usize,
    is_on: P,
    config: &TraceConfig,
    sink: &mut S,
) -> Result<Vec<Polyline>, TraceError>
where
    P: Fn(&T) -> bool,
    S: WarningSink,
{
    let image = BitImage::from_raw(data, is_on, rows, cols)?;
    Ok(trace_bit_image(image, config, sink))
}

/// Trace the skeleton of an already-built [`BitImage`] into polylines.
///
/// Consumes the image: thinning (when enabled) mutates it in place.
/// See [`trace_polylines`] for the result contract.
#[allow(clippy::cast_possible_truncation)]
pub fn trace_bit_image<S>(mut image: BitImage, config: &TraceConfig, sink: &mut S) -> Vec<Polyline>
where
    S: WarningSink,
{
    if image.rows() < MIN_IMAGE_SIZE || image.cols() < MIN_IMAGE_SIZE {
        sink.warn("cannot fit polylines to an image smaller than 3x3");
        return Vec::new();
    }

    if config.thinning {
        thin(&mut image);
    }

    let min_section_size = config.min_section_size.max(MIN_IMAGE_SIZE);
    let max_recursions = if config.max_recursions == 0 {
        usize::MAX
    } else {
        config.max_recursions
    };

    let traced = trace::trace_section(
        &image,
        0,
        0,
        image.rows(),
        image.cols(),
        0,
        min_section_size,
        max_recursions,
    );

    traced
        .into_iter()
        .map(|line| {
            Polyline::new(
                line.into_iter()
                    .map(|px| {
                        let (r, c) = image.coords(px);
                        (r as u32, c as u32)
                    })
                    .collect(),
            )
        })
        .collect()
}
