use std::path::Path;

use indicatif::ProgressIterator;
use landmask_align::LandmarkSet;
use landmask_image::{Image, ImageSize};
use landmask_imgproc::{interpolation::InterpolationMode, resize::resize_fast};
use landmask_io::{annotations, functional as F, labels};

use crate::config::DatasetConfig;
use crate::error::DatasetError;
use crate::report::{progress_bar, BatchReport};

/// Rescale landmarks from an image of size `from` to an image of size `to`.
///
/// `x` scales with the width ratio and `y` with the height ratio.
pub fn resize_landmarks(landmarks: &LandmarkSet, from: ImageSize, to: ImageSize) -> LandmarkSet {
    landmarks.scaled(
        to.width as f64 / from.width as f64,
        to.height as f64 / from.height as f64,
    )
}

/// Read an image, resize it bilinearly to `size` and write it to `dst_path`.
///
/// Returns the size of the source image.
fn resize_file(
    src_path: &Path,
    dst_path: &Path,
    size: ImageSize,
    quality: u8,
) -> Result<ImageSize, DatasetError> {
    let src = F::read_image_any_rgb8(src_path)?;
    if src.size().is_empty() {
        return Err(DatasetError::EmptyImage(src_path.to_path_buf()));
    }

    let mut dst = Image::<u8, 3>::from_size_val(size, 0)?;
    resize_fast(&src, &mut dst, InterpolationMode::Bilinear)?;
    F::write_image_rgb8(dst_path, &dst, quality)?;

    log::debug!(
        "resized {} ({}) to {}",
        src_path.display(),
        src.size(),
        dst_path.display()
    );

    Ok(src.size())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Resize the annotated images to `output_size`.
///
/// Every complete annotation group of the csv found in `root` is read from
/// `images_dir`, resized and written as `resized_dir/<k>.jpg`, where `k`
/// counts the images written so far. The rescaled landmarks are saved, in the
/// same order, to `resized_labels`.
///
/// An image that cannot be read or written is skipped along with its labels.
///
/// # Errors
///
/// Missing annotations, an output directory that cannot be created or a
/// label file that cannot be written.
pub fn resize_dataset(config: &DatasetConfig) -> Result<BatchReport, DatasetError> {
    config.validate()?;

    let images = annotations::load_annotations(&config.root, true)?;
    let images_dir = config.images_path();
    let out_dir = config.resized_path();
    let output_size = config.output_size();
    std::fs::create_dir_all(&out_dir)?;

    log::info!(
        "resizing {} images to {} into {}",
        images.len(),
        output_size,
        out_dir.display()
    );

    let mut report = BatchReport::default();
    let mut resized_labels = Vec::with_capacity(images.len());

    let pb = progress_bar(images.len(), config.show_progress)?;
    for image in images.iter().progress_with(pb) {
        let dst_path = out_dir.join(format!("{}.jpg", resized_labels.len()));
        match resize_file(
            &images_dir.join(&image.filename),
            &dst_path,
            output_size,
            config.jpeg_quality,
        ) {
            Ok(src_size) => {
                resized_labels.push(resize_landmarks(&image.landmarks, src_size, output_size));
                report.record_processed();
            }
            Err(e) => report.record_skipped(&image.filename, e),
        }
    }

    labels::write_labels(config.resized_labels_path(), &resized_labels)?;
    log::info!("resize: {report}");

    Ok(report)
}

/// Resize the output of [`resize_dataset`] again, to `re_resize_size`.
///
/// The files of `resized_dir` are taken in numeric order and paired with the
/// entries of `resized_labels`. They are written as `re_resized_dir/<i>.jpg`
/// with their rescaled labels in `re_resized_labels`.
///
/// # Errors
///
/// [`DatasetError::LabelCountMismatch`] when the number of files and labels
/// differ, plus the directory-level errors of [`resize_dataset`].
pub fn re_resize_dataset(config: &DatasetConfig) -> Result<BatchReport, DatasetError> {
    config.validate()?;

    let src_labels = labels::read_labels(config.resized_labels_path())?;
    let files = F::list_files_sorted(config.resized_path())?;
    if files.len() != src_labels.len() {
        return Err(DatasetError::LabelCountMismatch {
            images: files.len(),
            labels: src_labels.len(),
        });
    }

    let out_dir = config.re_resized_path();
    let output_size = config.re_resize_size();
    std::fs::create_dir_all(&out_dir)?;

    log::info!(
        "re-resizing {} images to {} into {}",
        files.len(),
        output_size,
        out_dir.display()
    );

    let mut report = BatchReport::default();
    let mut out_labels = Vec::with_capacity(src_labels.len());

    let pb = progress_bar(files.len(), config.show_progress)?;
    for (src_path, landmarks) in files.iter().zip(&src_labels).progress_with(pb) {
        let dst_path = out_dir.join(format!("{}.jpg", out_labels.len()));
        match resize_file(src_path, &dst_path, output_size, config.jpeg_quality) {
            Ok(src_size) => {
                out_labels.push(resize_landmarks(landmarks, src_size, output_size));
                report.record_processed();
            }
            Err(e) => report.record_skipped(file_name(src_path), e),
        }
    }

    labels::write_labels(config.re_resized_labels_path(), &out_labels)?;
    log::info!("re-resize: {report}");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn landmarks_follow_each_axis() {
        let landmarks = LandmarkSet::new(fixtures::FACE);
        let resized = resize_landmarks(&landmarks, [50, 40].into(), [100, 10].into());
        assert_relative_eq!(resized[0].x, 24.0);
        assert_relative_eq!(resized[0].y, 3.5);
        assert_relative_eq!(resized[5].y, 10.0);
    }

    #[test]
    fn resize_and_re_resize() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        let body = [
            fixtures::via_rows("a.png", &fixtures::FACE),
            fixtures::via_rows("b.png", &fixtures::FACE),
        ]
        .concat();
        let mut config =
            fixtures::dataset(tmp_dir.path(), &[("a.png", 50, 50), ("b.png", 25, 50)], &body)?;
        config.output_size = [20, 10];
        config.re_resize_size = [10, 10];

        let report = resize_dataset(&config)?;
        assert_eq!(report.processed, 2);
        assert!(report.skipped.is_empty());

        let resized = F::read_image_size(config.resized_path().join("1.jpg"))?;
        assert_eq!(resized, [20, 10].into());

        let resized_labels = labels::read_labels(config.resized_labels_path())?;
        assert_eq!(resized_labels.len(), 2);
        assert_relative_eq!(resized_labels[0][0].x, 12.0 * 0.4, epsilon = 1e-9);
        assert_relative_eq!(resized_labels[0][0].y, 14.0 * 0.2, epsilon = 1e-9);
        assert_relative_eq!(resized_labels[1][0].x, 12.0 * 0.8, epsilon = 1e-9);

        let report = re_resize_dataset(&config)?;
        assert_eq!(report.processed, 2);

        let re_resized_labels = labels::read_labels(config.re_resized_labels_path())?;
        assert_relative_eq!(re_resized_labels[0][0].x, 12.0 * 0.2, epsilon = 1e-9);
        assert_relative_eq!(re_resized_labels[0][0].y, 14.0 * 0.2, epsilon = 1e-9);
        assert_eq!(
            F::read_image_size(config.re_resized_path().join("0.jpg"))?,
            [10, 10].into()
        );
        Ok(())
    }

    #[test]
    fn unreadable_image_is_skipped() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        let body = [
            fixtures::via_rows("missing.png", &fixtures::FACE),
            fixtures::via_rows("a.png", &fixtures::FACE),
        ]
        .concat();
        let config = fixtures::dataset(tmp_dir.path(), &[("a.png", 50, 50)], &body)?;

        let report = resize_dataset(&config)?;
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "missing.png");

        // output names stay contiguous
        assert!(config.resized_path().join("0.jpg").exists());
        assert!(!config.resized_path().join("1.jpg").exists());
        assert_eq!(labels::read_labels(config.resized_labels_path())?.len(), 1);
        Ok(())
    }

    #[test]
    fn label_count_mismatch() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        let body = fixtures::via_rows("a.png", &fixtures::FACE);
        let mut config = fixtures::dataset(tmp_dir.path(), &[("a.png", 50, 50)], &body)?;
        config.output_size = [20, 20];

        resize_dataset(&config)?;
        F::write_image_rgb8(
            config.resized_path().join("1.jpg"),
            &fixtures::gradient(20, 20)?,
            config.jpeg_quality,
        )?;

        let res = re_resize_dataset(&config);
        assert!(matches!(
            res,
            Err(DatasetError::LabelCountMismatch {
                images: 2,
                labels: 1
            })
        ));
        Ok(())
    }
}
