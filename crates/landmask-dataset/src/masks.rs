use std::path::Path;

use indicatif::ProgressIterator;
use landmask_align::{face_mask, LandmarkSet};
use landmask_io::{annotations, functional as F};

use crate::config::DatasetConfig;
use crate::error::DatasetError;
use crate::report::{progress_bar, BatchReport};

fn mask_file(
    src_path: &Path,
    dst_path: &Path,
    landmarks: &LandmarkSet,
    quality: u8,
) -> Result<(), DatasetError> {
    let size = F::read_image_size(src_path)?;
    if size.is_empty() {
        return Err(DatasetError::EmptyImage(src_path.to_path_buf()));
    }

    let mask = face_mask(landmarks, size)?;
    F::write_image_mono8(dst_path, &mask.to_mono8(), quality)?;

    log::debug!(
        "{}: {} of {} pixels in the face region",
        src_path.display(),
        mask.count_nonzero(),
        size.area()
    );

    Ok(())
}

/// Compute the face-region mask of every annotated image.
///
/// Only images annotated with exactly 7 landmarks are considered. For each
/// of them the alignment transform is solved, the mask is rasterized at the
/// size of the source image and written to `masks_dir` under the source file
/// name, as an 8-bit image holding 0 and 255.
///
/// An image with degenerate landmarks or an I/O failure is skipped.
pub fn compute_masks(config: &DatasetConfig) -> Result<BatchReport, DatasetError> {
    config.validate()?;

    let images = annotations::load_annotations(&config.root, true)?;
    let images_dir = config.images_path();
    let out_dir = config.masks_path();
    std::fs::create_dir_all(&out_dir)?;

    log::info!(
        "computing {} masks into {}",
        images.len(),
        out_dir.display()
    );

    let mut report = BatchReport::default();

    let pb = progress_bar(images.len(), config.show_progress)?;
    for image in images.iter().progress_with(pb) {
        match mask_file(
            &images_dir.join(&image.filename),
            &out_dir.join(&image.filename),
            &image.landmarks,
            config.jpeg_quality,
        ) {
            Ok(()) => report.record_processed(),
            Err(e) => report.record_skipped(&image.filename, e),
        }
    }

    log::info!("masks: {report}");

    Ok(report)
}
