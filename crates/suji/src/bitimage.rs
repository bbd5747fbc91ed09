//! Binary image buffer: a row-major grid of on/off bits.
//!
//! Pixels are addressed by a *locator* -- the linear index
//! `row * cols + col`. Locators are stable for the lifetime of the image,
//! compare cheaply, and convert back to `(row, column)` in O(1), which is
//! what the tracer relies on when it matches polyline endpoints across
//! section boundaries.

use image::GrayImage;

use crate::types::TraceError;

/// Linear pixel locator into a [`BitImage`]: `row * cols + col`.
pub type Px = usize;

/// A row-major binary image.
///
/// The grid dimensions are fixed at construction; only the bit values can
/// change afterwards (the thinner flips bits from on to off in place).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitImage {
    rows: usize,
    cols: usize,
    bits: Vec<u8>,
}

impl BitImage {
    /// Create an all-off image with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::SizeOverflow`] if `rows * cols` does not fit
    /// in `usize`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, TraceError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(TraceError::SizeOverflow { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            bits: vec![0; len],
        })
    }

    /// Build an image from caller pixel data by applying `is_on` to every
    /// element in row-major order.
    ///
    /// The pixel type is entirely the caller's: any `&[T]` works as long as
    /// the predicate can classify an element as on or off.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::SizeOverflow`] if `rows * cols` does not fit
    /// in `usize`, or [`TraceError::SizeMismatch`] if `data.len()` is not
    /// exactly `rows * cols`.
    pub fn from_raw<T, P>(
        data: &[T],
        is_on: P,
        rows: usize,
        cols: usize,
    ) -> Result<Self, TraceError>
    where
        P: Fn(&T) -> bool,
    {
        let mut image = Self::new(rows, cols)?;
        if data.len() != image.bits.len() {
            return Err(TraceError::SizeMismatch {
                expected: image.bits.len(),
                actual: data.len(),
            });
        }
        for (bit, px) in image.bits.iter_mut().zip(data) {
            *bit = u8::from(is_on(px));
        }
        Ok(image)
    }

    /// Build an image from a grayscale raster: pixels with luminance
    /// strictly above `threshold` are on.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::SizeOverflow`] for degenerate dimensions; a
    /// well-formed `GrayImage` never mismatches.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_gray(image: &GrayImage, threshold: u8) -> Result<Self, TraceError> {
        Self::from_raw(
            image.as_raw(),
            |&luma| luma > threshold,
            image.height() as usize,
            image.width() as usize,
        )
    }

    /// Number of image rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of image columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Translate a locator back to `(row, column)`.
    #[must_use]
    pub const fn coords(&self, px: Px) -> (usize, usize) {
        (px / self.cols, px % self.cols)
    }

    /// Locator of the pixel at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the image.
    #[must_use]
    pub fn locator(&self, row: usize, col: usize) -> Px {
        assert!(
            row < self.rows && col < self.cols,
            "pixel ({row}, {col}) out of bounds for {}x{} image",
            self.rows,
            self.cols,
        );
        row * self.cols + col
    }

    /// Whether the pixel behind `px` is on.
    #[must_use]
    pub fn is_on(&self, px: Px) -> bool {
        self.bits[px] != 0
    }

    /// Set the pixel behind `px` on or off.
    pub fn set(&mut self, px: Px, on: bool) {
        self.bits[px] = u8::from(on);
    }

    /// Locators of all pixels in the rectangle starting at `(r0, c0)` with
    /// `rows x cols` extent, enumerated in row-major order.
    ///
    /// The tracer's frame traversal depends on this order being
    /// deterministic.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle does not fit inside the image.
    #[must_use]
    pub fn section(&self, r0: usize, c0: usize, rows: usize, cols: usize) -> Vec<Px> {
        assert!(
            r0 + rows <= self.rows && c0 + cols <= self.cols,
            "section ({r0}, {c0}, {rows}, {cols}) out of bounds for {}x{} image",
            self.rows,
            self.cols,
        );
        let mut pixels = Vec::with_capacity(rows * cols);
        for r in r0..r0 + rows {
            for c in c0..c0 + cols {
                pixels.push(r * self.cols + c);
            }
        }
        pixels
    }

    /// Number of on pixels in the whole image.
    #[must_use]
    pub fn on_pixel_count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit != 0).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn image_from_rows(rows: &[&[u8]]) -> BitImage {
        let data: Vec<u8> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        BitImage::from_raw(&data, |&px| px != 0, rows.len(), rows[0].len()).unwrap()
    }

    #[test]
    fn new_image_is_all_off() {
        let image = BitImage::new(4, 5).unwrap();
        assert_eq!(image.rows(), 4);
        assert_eq!(image.cols(), 5);
        assert_eq!(image.on_pixel_count(), 0);
    }

    #[test]
    fn new_rejects_overflowing_dimensions() {
        let result = BitImage::new(usize::MAX, 2);
        assert!(matches!(result, Err(TraceError::SizeOverflow { .. })));
    }

    #[test]
    fn from_raw_applies_predicate() {
        let data = [10_u8, 200, 30, 250];
        let image = BitImage::from_raw(&data, |&px| px > 100, 2, 2).unwrap();
        assert!(!image.is_on(image.locator(0, 0)));
        assert!(image.is_on(image.locator(0, 1)));
        assert!(!image.is_on(image.locator(1, 0)));
        assert!(image.is_on(image.locator(1, 1)));
    }

    #[test]
    fn from_raw_rejects_length_mismatch() {
        let data = [0_u8; 5];
        let result = BitImage::from_raw(&data, |&px| px != 0, 2, 3);
        assert!(matches!(
            result,
            Err(TraceError::SizeMismatch {
                expected: 6,
                actual: 5,
            }),
        ));
    }

    #[test]
    fn from_gray_thresholds_luminance() {
        let mut gray = GrayImage::new(3, 2);
        gray.put_pixel(1, 0, image::Luma([200]));
        gray.put_pixel(2, 1, image::Luma([128]));

        let image = BitImage::from_gray(&gray, 128).unwrap();
        assert_eq!(image.rows(), 2);
        assert_eq!(image.cols(), 3);
        assert!(image.is_on(image.locator(0, 1)));
        // 128 is not strictly above the threshold.
        assert!(!image.is_on(image.locator(1, 2)));
        assert_eq!(image.on_pixel_count(), 1);
    }

    #[test]
    fn coords_and_locator_round_trip() {
        let image = BitImage::new(4, 7).unwrap();
        for row in 0..4 {
            for col in 0..7 {
                let px = image.locator(row, col);
                assert_eq!(image.coords(px), (row, col));
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn locator_panics_out_of_bounds() {
        let image = BitImage::new(3, 3).unwrap();
        let _ = image.locator(3, 0);
    }

    #[test]
    fn section_is_row_major() {
        let image = BitImage::new(4, 4).unwrap();
        let section = image.section(1, 1, 2, 3);
        let coords: Vec<_> = section.iter().map(|&px| image.coords(px)).collect();
        assert_eq!(
            coords,
            vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)],
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn section_panics_when_escaping_image() {
        let image = BitImage::new(3, 3).unwrap();
        let _ = image.section(1, 1, 3, 1);
    }

    #[test]
    fn set_flips_bits() {
        let mut image = BitImage::new(2, 2).unwrap();
        let px = image.locator(1, 0);
        image.set(px, true);
        assert!(image.is_on(px));
        image.set(px, false);
        assert!(!image.is_on(px));
    }

    #[test]
    fn on_pixel_count_matches_content() {
        let image = image_from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]]);
        assert_eq!(image.on_pixel_count(), 5);
    }
}
