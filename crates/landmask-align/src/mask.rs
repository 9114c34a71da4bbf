use landmask_image::{Image, ImageSize};
use landmask_imgproc::parallel;

use crate::error::AlignError;
use crate::landmarks::Point2;
use crate::transform::SimilarityTransform;

/// Edges shorter than this (squared, in pixels²) make the mask degenerate.
const EDGE_EPSILON: f64 = 1e-12;

/// A binary face-region mask with the same size as its source image.
///
/// Pixels inside the face region hold 1, every other pixel holds 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask(Image<u8, 1>);

impl Mask {
    /// The mask size in pixels.
    pub fn size(&self) -> ImageSize {
        self.0.size()
    }

    /// The mask value at `(row, col)`, `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.0.get([row, col, 0]).map(|&v| v != 0)
    }

    /// Number of pixels inside the face region.
    pub fn count_nonzero(&self) -> usize {
        self.0.as_slice().iter().filter(|&&v| v != 0).count()
    }

    /// The raw 0/1 values.
    pub fn as_image(&self) -> &Image<u8, 1> {
        &self.0
    }

    /// The mask as an 8-bit image with 0 and 255, ready to be written to disk.
    pub fn to_mono8(&self) -> Image<u8, 1> {
        let mut out = self.0.clone();
        out.as_slice_mut().iter_mut().for_each(|v| *v *= 255);
        out
    }

    /// The mask as a floating point image with 0.0 and 1.0.
    pub fn to_f32(&self) -> Result<Image<f32, 1>, AlignError> {
        Ok(self.0.cast()?)
    }
}

/// Inclusive pixel range `[lo, hi]` along one axis covering `values`, padded by
/// one pixel and clamped to `[0, len)`. `None` when it misses the image.
fn axis_range(values: [f64; 4], len: usize) -> Option<(usize, usize)> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let lo = (min.floor() as i64).saturating_sub(1).max(0);
    let hi = (max.ceil() as i64)
        .saturating_add(1)
        .min(len as i64 - 1);

    (len > 0 && lo <= hi).then_some((lo as usize, hi as usize))
}

/// Rasterize the face-region mask of an image.
///
/// The transform maps image pixels to the canonical frame, as returned by
/// [`crate::solve`]. It is inverted to find the corners `A = P(0, 0)`,
/// `B = P(1, 0)` and `D = P(0, 1)` of the canonical unit square in the image.
/// The pixel at row `i` and column `j` is set when both normalized projections
///
/// * `dot1 = ((j, i) - A) · AB / |AB|²`
/// * `dot2 = ((j, i) - A) · AD / |AD|²`
///
/// lie in `[0, 1]`, boundaries included.
///
/// Only the bounding box of the corners is evaluated, row by row in parallel;
/// the rest of the mask stays 0.
///
/// # Arguments
///
/// * `transform` - The image-to-canonical similarity transform.
/// * `size` - The size of the source image.
///
/// # Errors
///
/// Returns [`AlignError::DegenerateGeometry`] when the transform cannot be
/// inverted or maps the unit square to a zero-length edge.
pub fn rasterize(transform: &SimilarityTransform, size: ImageSize) -> Result<Mask, AlignError> {
    let canonical_to_image = transform.inverse()?;

    let a = canonical_to_image.apply(Point2::new(0.0, 0.0));
    let b = canonical_to_image.apply(Point2::new(1.0, 0.0));
    let d = canonical_to_image.apply(Point2::new(0.0, 1.0));

    let ab = b - a;
    let ad = d - a;

    let n_ab = ab.x * ab.x + ab.y * ab.y;
    let n_ad = ad.x * ad.x + ad.y * ad.y;

    if !(n_ab > EDGE_EPSILON && n_ad > EDGE_EPSILON) || !n_ab.is_finite() || !n_ad.is_finite() {
        return Err(AlignError::DegenerateGeometry(format!(
            "mask parallelogram has a degenerate edge (|AB|² = {n_ab:e}, |AD|² = {n_ad:e})"
        )));
    }

    let mut mask = Image::<u8, 1>::from_size_val(size, 0)?;

    let c = b + ad;
    let cols = axis_range([a.x, b.x, c.x, d.x], size.width);
    let rows = axis_range([a.y, b.y, c.y, d.y], size.height);

    let (Some((col_lo, col_hi)), Some((row_lo, row_hi))) = (cols, rows) else {
        return Ok(Mask(mask));
    };

    parallel::par_iter_rows_mut(&mut mask, |i, row| {
        if i < row_lo || i > row_hi {
            return;
        }
        let ax_y = i as f64 - a.y;
        for (j, pixel) in row.iter_mut().enumerate().take(col_hi + 1).skip(col_lo) {
            let ax_x = j as f64 - a.x;
            let dot1 = (ax_x * ab.x + ax_y * ab.y) / n_ab;
            let dot2 = (ax_x * ad.x + ax_y * ad.y) / n_ad;
            if (0.0..=1.0).contains(&dot1) && (0.0..=1.0).contains(&dot2) {
                *pixel = 1;
            }
        }
    });

    Ok(Mask(mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Reference implementation: every pixel, no bounding box.
    fn rasterize_dense(transform: &SimilarityTransform, size: ImageSize) -> Vec<u8> {
        let p = transform.inverse().unwrap();
        let a = p.apply(Point2::new(0.0, 0.0));
        let ab = p.apply(Point2::new(1.0, 0.0)) - a;
        let ad = p.apply(Point2::new(0.0, 1.0)) - a;
        let n_ab = ab.x * ab.x + ab.y * ab.y;
        let n_ad = ad.x * ad.x + ad.y * ad.y;

        let mut out = vec![0u8; size.area()];
        for i in 0..size.height {
            for j in 0..size.width {
                let ax = Point2::new(j as f64 - a.x, i as f64 - a.y);
                let dot1 = (ax.x * ab.x + ax.y * ab.y) / n_ab;
                let dot2 = (ax.x * ad.x + ax.y * ad.y) / n_ad;
                if (0.0..=1.0).contains(&dot1) && (0.0..=1.0).contains(&dot2) {
                    out[i * size.width + j] = 1;
                }
            }
        }
        out
    }

    #[test]
    fn identity_marks_unit_square_inclusive() -> Result<(), AlignError> {
        let mask = rasterize(&SimilarityTransform::identity(), [5, 4].into())?;
        assert_eq!(mask.count_nonzero(), 4);
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert_eq!(mask.get(row, col), Some(true));
        }
        assert_eq!(mask.get(0, 2), Some(false));
        assert_eq!(mask.get(2, 0), Some(false));
        Ok(())
    }

    #[test]
    fn square_spanning_image_marks_every_pixel() -> Result<(), AlignError> {
        // canonical unit square maps onto [0, 8] x [0, 8]
        let transform = SimilarityTransform::new(0.125, 0.0, 0.0, 0.0);

        let mask = rasterize(&transform, [9, 9].into())?;
        assert_eq!(mask.count_nonzero(), 81);

        let mask = rasterize(&transform, [9, 5].into())?;
        assert_eq!(mask.count_nonzero(), 45);

        // one pixel beyond the far edge stays outside
        let mask = rasterize(&transform, [10, 10].into())?;
        assert_eq!(mask.count_nonzero(), 81);
        assert_eq!(mask.get(9, 9), Some(false));
        assert_eq!(mask.get(8, 8), Some(true));
        Ok(())
    }

    #[test]
    fn pixel_count_matches_area() -> Result<(), AlignError> {
        let side = 40.0;
        let placement = SimilarityTransform::from_angle_scale(0.5, side, 50.0, 20.0);
        let transform = placement.inverse()?;

        let mask = rasterize(&transform, [100, 100].into())?;
        let area = side * side;
        let count = mask.count_nonzero() as f64;
        assert_relative_eq!(count, area, max_relative = 0.1);
        Ok(())
    }

    #[test]
    fn matches_dense_evaluation() -> Result<(), AlignError> {
        let size: ImageSize = [64, 48].into();
        for (angle, scale, tx, ty) in [
            (0.3, 30.0, 20.0, 5.0),
            (-2.0, 55.0, 60.0, 40.0),
            (1.2, 80.0, -10.0, -30.0),
            (0.0, 1000.0, -500.0, -500.0),
        ] {
            let transform = SimilarityTransform::from_angle_scale(angle, scale, tx, ty).inverse()?;
            let mask = rasterize(&transform, size)?;
            assert_eq!(mask.as_image().as_slice(), rasterize_dense(&transform, size).as_slice());
        }
        Ok(())
    }

    #[test]
    fn outside_image_is_empty() -> Result<(), AlignError> {
        let placement = SimilarityTransform::from_angle_scale(0.0, 10.0, 500.0, 500.0);
        let mask = rasterize(&placement.inverse()?, [32, 32].into())?;
        assert_eq!(mask.count_nonzero(), 0);
        assert_eq!(mask.size(), [32, 32].into());
        Ok(())
    }

    #[test]
    fn degenerate_transform_is_rejected() {
        let res = rasterize(&SimilarityTransform::new(0.0, 0.0, 1.0, 1.0), [8, 8].into());
        assert!(matches!(res, Err(AlignError::DegenerateGeometry(_))));

        // a huge scale shrinks the square below a pixel²
        let res = rasterize(&SimilarityTransform::new(1e9, 0.0, 0.0, 0.0), [8, 8].into());
        assert!(matches!(res, Err(AlignError::DegenerateGeometry(_))));
    }

    #[test]
    fn output_encodings() -> Result<(), AlignError> {
        let mask = rasterize(&SimilarityTransform::identity(), [3, 3].into())?;
        let mono = mask.to_mono8();
        assert_eq!(mono.as_slice(), &[255, 255, 0, 255, 255, 0, 0, 0, 0]);
        let float = mask.to_f32()?;
        assert_eq!(float.as_slice()[0], 1.0);
        assert_eq!(float.as_slice()[8], 0.0);
        Ok(())
    }
}
