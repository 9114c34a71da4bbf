#![deny(missing_docs)]
//! Similarity alignment of 7-point facial landmarks and face-region masks.
//!
//! The pipeline for one image is:
//!
//! 1. [`solve`] fits the similarity transform that maps the landmarks to the
//!    canonical frame (axis points on the vertical center line, anchor pairs
//!    centered and level).
//! 2. [`rasterize`] inverts it and marks every pixel whose position falls in
//!    the image of the canonical unit square.
//!
//! Both functions are pure. A degenerate landmark configuration is reported as
//! [`AlignError::DegenerateGeometry`] so that batch callers can skip the image.
//!
//! ```
//! use landmask_align::{rasterize, solve, LandmarkSet};
//!
//! let landmarks = LandmarkSet::new([
//!     [120.0, 140.0],
//!     [160.0, 240.0],
//!     [200.0, 200.0],
//!     [240.0, 240.0],
//!     [280.0, 140.0],
//!     [200.0, 400.0],
//!     [200.0, 0.0],
//! ]);
//!
//! let transform = solve(&landmarks).unwrap();
//! let mask = rasterize(&transform, [500, 500].into()).unwrap();
//! assert!(mask.count_nonzero() > 0);
//! ```

mod error;
mod landmarks;
mod mask;
mod solver;
mod transform;

pub use error::AlignError;
pub use landmarks::{LandmarkSet, Point2, NUM_LANDMARKS};
pub use mask::{rasterize, Mask};
pub use solver::solve;
pub use transform::SimilarityTransform;

/// Fit the alignment transform for `landmarks` and rasterize its face mask.
pub fn face_mask(
    landmarks: &LandmarkSet,
    size: landmask_image::ImageSize,
) -> Result<Mask, AlignError> {
    let transform = solve(landmarks)?;
    rasterize(&transform, size)
}
