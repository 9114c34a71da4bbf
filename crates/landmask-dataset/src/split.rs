use indicatif::ProgressIterator;
use landmask_align::LandmarkSet;
use landmask_image::Image;
use landmask_io::{functional as F, labels};

use crate::config::DatasetConfig;
use crate::error::DatasetError;
use crate::report::progress_bar;

/// Resized images and their labels, split for training and validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSplit {
    /// Training images
    pub train_images: Vec<Image<u8, 3>>,
    /// Landmarks of the training images
    pub train_labels: Vec<LandmarkSet>,
    /// Validation images
    pub valid_images: Vec<Image<u8, 3>>,
    /// Landmarks of the validation images
    pub valid_labels: Vec<LandmarkSet>,
}

impl DatasetSplit {
    /// Split paired images and labels at `floor(ratio * n)`.
    ///
    /// # Errors
    ///
    /// [`DatasetError::LabelCountMismatch`] when the lengths differ and
    /// [`DatasetError::InvalidConfig`] when `ratio` is outside `[0, 1]`.
    pub fn new(
        mut images: Vec<Image<u8, 3>>,
        mut labels: Vec<LandmarkSet>,
        ratio: f64,
    ) -> Result<Self, DatasetError> {
        if images.len() != labels.len() {
            return Err(DatasetError::LabelCountMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }
        if !(0.0..=1.0).contains(&ratio) {
            return Err(DatasetError::InvalidConfig(format!(
                "split must be within [0, 1], got {ratio}"
            )));
        }

        let at = ((ratio * images.len() as f64).floor() as usize).min(images.len());
        let valid_images = images.split_off(at);
        let valid_labels = labels.split_off(at);

        Ok(Self {
            train_images: images,
            train_labels: labels,
            valid_images,
            valid_labels,
        })
    }

    /// Number of training samples.
    pub fn num_train(&self) -> usize {
        self.train_images.len()
    }

    /// Number of validation samples.
    pub fn num_valid(&self) -> usize {
        self.valid_images.len()
    }
}

/// Load the output of [`crate::resize_dataset`] and split it.
///
/// Images are read from `resized_dir` in numeric order and paired with
/// `resized_labels`.
///
/// # Errors
///
/// Any unreadable image, a missing label file, or a count mismatch between
/// images and labels.
pub fn load_resized_dataset(config: &DatasetConfig) -> Result<DatasetSplit, DatasetError> {
    config.validate()?;

    let labels = labels::read_labels(config.resized_labels_path())?;
    let files = F::list_files_sorted(config.resized_path())?;
    if files.len() != labels.len() {
        return Err(DatasetError::LabelCountMismatch {
            images: files.len(),
            labels: labels.len(),
        });
    }

    log::info!("loading {} resized images", files.len());

    let pb = progress_bar(files.len(), config.show_progress)?;
    let images = files
        .iter()
        .progress_with(pb)
        .map(F::read_image_any_rgb8)
        .collect::<Result<Vec<_>, _>>()?;

    let split = DatasetSplit::new(images, labels, config.split)?;
    log::info!(
        "split into {} training and {} validation images",
        split.num_train(),
        split.num_valid()
    );

    Ok(split)
}
