use std::path::PathBuf;

/// An error type for the dataset drivers.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// Error while reading or writing dataset files.
    #[error(transparent)]
    Io(#[from] landmask_io::IoError),

    /// Error from a file system operation.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error while creating or resizing an image.
    #[error(transparent)]
    Image(#[from] landmask_image::ImageError),

    /// Error while aligning the landmarks or rasterizing the mask.
    #[error(transparent)]
    Align(#[from] landmask_align::AlignError),

    /// The decoded image has no pixels.
    #[error("Image {0} is empty")]
    EmptyImage(PathBuf),

    /// The number of images and labels differ.
    #[error("Found {images} images but {labels} labels")]
    LabelCountMismatch {
        /// Number of images found
        images: usize,
        /// Number of labels found
        labels: usize,
    },

    /// A rename target is already taken by a file that was not renamed.
    #[error("Cannot rename to {0}: the file already exists")]
    RenameConflict(PathBuf),

    /// An invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An invalid progress bar template.
    #[error("Invalid progress bar template. {0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),
}
