use std::path::PathBuf;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(PathBuf),

    /// Error when no annotation file is found in a directory.
    #[error("No csv annotation file found in {0}")]
    AnnotationFileNotFound(PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode or encode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] landmask_image::ImageError),

    /// Error while reading the csv file.
    #[error("Failed to read the csv file. {0}")]
    CsvError(#[from] csv::Error),

    /// Error while reading or writing a json file.
    #[error("Failed to (de)serialize json. {0}")]
    JsonError(#[from] serde_json::Error),

    /// A malformed annotation record.
    #[error("Malformed annotation at line {line}: {reason}")]
    Annotation {
        /// Line of the record in the csv file
        line: u64,
        /// What is wrong with the record
        reason: String,
    },

    /// Landmarks that cannot form a landmark set.
    #[error("Invalid landmarks. {0}")]
    LandmarkError(#[from] landmask_align::AlignError),
}
