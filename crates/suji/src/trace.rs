//! Recursive split-and-merge skeleton tracing.
//!
//! The image is split along the row or column with the fewest on pixels
//! near the section centre; both halves share the split line, so strokes
//! crossing it end on the same pixel in each half and the merger glues them
//! back together. Sections too small to split (or past the recursion
//! limit) get segments fitted from their frame towards their interior.

use crate::bitimage::{BitImage, Px};
use crate::merge::merge_polylines;

/// Sections with both extents below this cannot be split further: each
/// half must keep at least 3 rows or columns for the leaf fitter's 3x3
/// neighbourhood to stay inside the section.
const MIN_SPLIT_SIZE: usize = 5;

/// A 3x3 neighbourhood with this many on pixels ends the intersection
/// search early.
const MIN_INTERSECTION_NEIGHBOURS: usize = 5;

/// Recursively trace the section `(r0, c0, rows, cols)`.
///
/// `min_section_size` must already be floored to 3 and `max_recursions`
/// saturated by the caller.
pub(crate) fn trace_section(
    image: &BitImage,
    r0: usize,
    c0: usize,
    rows: usize,
    cols: usize,
    depth: usize,
    min_section_size: usize,
    max_recursions: usize,
) -> Vec<Vec<Px>> {
    // Nothing to trace in an all-off section.
    if !image
        .section(r0, c0, rows, cols)
        .iter()
        .any(|&px| image.is_on(px))
    {
        return Vec::new();
    }

    let min_split_size = min_section_size.max(MIN_SPLIT_SIZE);
    if depth >= max_recursions || (cols < min_split_size && rows < min_split_size) {
        return fit_segments(image, r0, c0, rows, cols);
    }

    let split_rows = rows >= cols;
    let (dim, centre) = if split_rows {
        (rows, r0 + rows / 2)
    } else {
        (cols, c0 + cols / 2)
    };

    // Walk candidates outward from the centre with alternating sign
    // (0, -1, +1, -2, +2, ...), keeping the line with the fewest on
    // pixels; the earliest candidate wins ties.
    let mut best_split = centre;
    let mut min_on = usize::MAX;
    for i in 0..dim - 4 {
        let magnitude = (i + 1) / 2;
        let candidate = if i % 2 == 1 {
            centre - magnitude
        } else {
            centre + magnitude
        };

        let line = if split_rows {
            image.section(candidate, c0, 1, cols)
        } else {
            image.section(r0, candidate, rows, 1)
        };
        let on_count = line.iter().filter(|&&px| image.is_on(px)).count();

        if on_count < min_on {
            min_on = on_count;
            best_split = candidate;
        }
        if min_on == 0 {
            break;
        }
    }

    // Both halves include the split line, so boundary strokes appear in
    // each and can be merged on their shared endpoint.
    if split_rows {
        merge_polylines(
            trace_section(
                image,
                r0,
                c0,
                best_split - r0 + 1,
                cols,
                depth + 1,
                min_section_size,
                max_recursions,
            ),
            trace_section(
                image,
                best_split,
                c0,
                r0 + rows - best_split,
                cols,
                depth + 1,
                min_section_size,
                max_recursions,
            ),
        )
    } else {
        merge_polylines(
            trace_section(
                image,
                r0,
                c0,
                rows,
                best_split - c0 + 1,
                depth + 1,
                min_section_size,
                max_recursions,
            ),
            trace_section(
                image,
                r0,
                best_split,
                rows,
                c0 + cols - best_split,
                depth + 1,
                min_section_size,
                max_recursions,
            ),
        )
    }
}

/// Fit segments from the on runs of the section frame towards the
/// section's interior intersection pixel.
pub(crate) fn fit_segments(
    image: &BitImage,
    r0: usize,
    c0: usize,
    rows: usize,
    cols: usize,
) -> Vec<Vec<Px>> {
    let r1 = r0 + rows - 1;
    let c1 = c0 + cols - 1;

    // Frame pixels clockwise from the top-left corner, each corner visited
    // once. The capacity overshoots by four; the slack is harmless.
    let mut frame = Vec::with_capacity(2 * (rows + cols));
    frame.extend(image.section(r0, c0, 1, cols - 1));
    frame.extend(image.section(r0, c1, rows - 1, 1));
    frame.extend(image.section(r1, c0 + 1, 1, cols - 1).into_iter().rev());
    frame.extend(image.section(r0 + 1, c0, rows - 1, 1).into_iter().rev());

    let first_off = frame.iter().position(|&px| !image.is_on(px));
    let has_on = frame.iter().any(|&px| image.is_on(px));

    // A frame that is all on or all off separates nothing.
    let Some(first_off) = first_off else {
        return Vec::new();
    };
    if !has_on {
        return Vec::new();
    }

    // Start the traversal on an off pixel so every on run is contiguous.
    frame.rotate_left(first_off);

    let centre = image.locator(r0 + rows / 2, c0 + cols / 2);

    // One segment per maximal on run, anchored at the run's midpoint.
    let mut segments: Vec<Vec<Px>> = Vec::new();
    let mut cursor = 0;
    while let Some(run_offset) = frame[cursor..].iter().position(|&px| image.is_on(px)) {
        let run_start = cursor + run_offset;
        let run_len = frame[run_start..]
            .iter()
            .position(|&px| !image.is_on(px))
            .unwrap_or(frame.len() - run_start);
        segments.push(vec![frame[run_start + run_len / 2], centre]);
        cursor = run_start + run_len;
    }

    // Two frame runs form a single straight stroke through the section.
    if segments.len() == 2 {
        return vec![vec![segments[0][0], segments[1][0]]];
    }

    // Otherwise estimate the intersection: the interior pixel closest to
    // the centre whose 3x3 neighbourhood holds the most on pixels.
    let mut canvas = image.section(r0 + 1, c0 + 1, rows - 2, cols - 2);
    let (centre_row, centre_col) = image.coords(centre);
    canvas.sort_by_key(|&px| {
        let (r, c) = image.coords(px);
        r.abs_diff(centre_row) + c.abs_diff(centre_col)
    });

    let mut intersection = canvas[0];
    let mut max_neighbours = 0;
    for &px in &canvas {
        let (r, c) = image.coords(px);
        let neighbours = image
            .section(r - 1, c - 1, 3, 3)
            .iter()
            .filter(|&&p| image.is_on(p))
            .count();
        if neighbours > max_neighbours {
            max_neighbours = neighbours;
            intersection = px;
        }
        if max_neighbours >= MIN_INTERSECTION_NEIGHBOURS {
            break;
        }
    }

    for segment in &mut segments {
        let last = segment.len() - 1;
        segment[last] = intersection;
    }
    segments
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn image_from_rows(rows: &[&[u8]]) -> BitImage {
        let data: Vec<u8> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        BitImage::from_raw(&data, |&px| px != 0, rows.len(), rows[0].len()).unwrap()
    }

    fn coords_lines(image: &BitImage, lines: &[Vec<Px>]) -> Vec<Vec<(usize, usize)>> {
        lines
            .iter()
            .map(|line| line.iter().map(|&px| image.coords(px)).collect())
            .collect()
    }

    #[test]
    fn all_off_section_yields_nothing() {
        let image = BitImage::new(5, 5).unwrap();
        let lines = trace_section(&image, 0, 0, 5, 5, 0, 3, usize::MAX);
        assert!(lines.is_empty());
    }

    #[test]
    fn all_on_frame_yields_nothing() {
        let image = image_from_rows(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]]);
        assert!(fit_segments(&image, 0, 0, 3, 3).is_empty());
    }

    #[test]
    fn all_off_frame_yields_nothing() {
        // The frame is off even though the interior is on.
        let image = image_from_rows(&[
            &[0, 0, 0],
            &[0, 1, 0],
            &[0, 0, 0],
        ]);
        assert!(fit_segments(&image, 0, 0, 3, 3).is_empty());
    }

    #[test]
    fn cross_fits_four_segments_to_centre() {
        let image = image_from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]]);
        let segments = coords_lines(&image, &fit_segments(&image, 0, 0, 3, 3));

        assert_eq!(segments.len(), 4);
        for segment in &segments {
            assert_eq!(segment.len(), 2);
            assert_eq!(segment[1], (1, 1));
        }
        let starts: Vec<_> = segments.iter().map(|s| s[0]).collect();
        assert_eq!(starts, vec![(0, 1), (1, 2), (2, 1), (1, 0)]);
    }

    #[test]
    fn two_frame_runs_collapse_to_one_stroke() {
        let image = image_from_rows(&[
            &[0, 0, 0, 0],
            &[1, 1, 1, 1],
            &[0, 0, 0, 0],
        ]);
        let segments = coords_lines(&image, &fit_segments(&image, 0, 0, 3, 4));
        assert_eq!(segments, vec![vec![(1, 3), (1, 0)]]);
    }

    #[test]
    fn single_run_attaches_to_estimated_intersection() {
        // One on run on the frame; the lone interior pixel of the L corner
        // has the densest 3x3 neighbourhood.
        let image = image_from_rows(&[
            &[0, 0, 1, 0, 0],
            &[0, 0, 1, 0, 0],
            &[1, 1, 1, 0, 0],
            &[0, 0, 0, 0, 0],
            &[0, 0, 0, 0, 0],
        ]);
        let segments = coords_lines(&image, &fit_segments(&image, 0, 0, 3, 3));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0][0], (2, 2));
        assert_eq!(segments[0][1], (1, 1));
    }

    #[test]
    fn split_prefers_emptiest_line() {
        // Column 3 is entirely off, so the tracer splits there and each
        // half traces its own stroke; nothing crosses the split line.
        let image = image_from_rows(&[
            &[0, 0, 0, 0, 0, 0, 0],
            &[1, 1, 0, 0, 0, 1, 1],
            &[0, 0, 0, 0, 0, 0, 0],
        ]);
        let lines = trace_section(&image, 0, 0, 3, 7, 0, 3, usize::MAX);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn stroke_crossing_the_split_is_merged() {
        let image = image_from_rows(&[
            &[0, 0, 0, 0, 0, 0, 0],
            &[1, 1, 1, 1, 1, 1, 1],
            &[0, 0, 0, 0, 0, 0, 0],
        ]);
        let lines = coords_lines(&image, &trace_section(&image, 0, 0, 3, 7, 0, 5, usize::MAX));
        assert_eq!(lines, vec![vec![(1, 6), (1, 3), (1, 0)]]);
    }

    #[test]
    fn recursion_limit_forces_leaf_fit() {
        let image = image_from_rows(&[
            &[0, 0, 0, 0, 0, 0, 0],
            &[1, 1, 1, 1, 1, 1, 1],
            &[0, 0, 0, 0, 0, 0, 0],
        ]);
        // With no recursion allowance the whole image is one leaf.
        let lines = coords_lines(&image, &trace_section(&image, 0, 0, 3, 7, 0, 3, 0));
        assert_eq!(lines, vec![vec![(1, 6), (1, 0)]]);
    }
}
