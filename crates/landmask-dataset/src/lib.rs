#![deny(missing_docs)]
//! Batch drivers that turn an annotated landmark dataset into training data.
//!
//! A dataset lives under one root directory, described by [`DatasetConfig`]:
//!
//! ```text
//! root/
//! ├── via_export.csv         VIA landmark annotations, 7 points per image
//! ├── images/                source images
//! ├── resized/               resize_dataset output
//! ├── re_resized/            re_resize_dataset output
//! ├── masks/                 compute_masks output
//! ├── resized_labels.json
//! └── re_resized_labels.json
//! ```
//!
//! Drivers process the images one after the other. A failure on one image is
//! logged, recorded in the returned [`BatchReport`] and does not stop the
//! batch.

/// Dataset layout and parameters.
pub mod config;

/// Error types for the dataset drivers.
pub mod error;

/// Face-region masks of the annotated images.
pub mod masks;

/// Renumbering of image files.
pub mod rename;

/// Per-batch outcome and progress reporting.
pub mod report;

/// Image and label resizing.
pub mod resize;

/// Train and validation split of the resized dataset.
pub mod split;

#[cfg(test)]
mod fixtures;

pub use config::DatasetConfig;
pub use error::DatasetError;
pub use masks::compute_masks;
pub use rename::rename_dataset;
pub use report::{BatchReport, SkippedImage};
pub use resize::{re_resize_dataset, resize_dataset, resize_landmarks};
pub use split::{load_resized_dataset, DatasetSplit};
