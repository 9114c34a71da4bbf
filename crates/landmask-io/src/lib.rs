#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// VIA (VGG Image Annotator) landmark annotations.
///
/// Reads the CSV export, one row per landmark, and groups the rows into
/// [`annotations::AnnotatedImage`] values of 7 landmarks each.
pub mod annotations;

/// Error types for I/O operations.
pub mod error;

/// High-level image reading and writing functions.
pub mod functional;

/// Landmark label files, stored as JSON.
pub mod labels;

pub use error::IoError;
