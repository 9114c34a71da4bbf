/// Errors raised while aligning landmarks or rasterizing a mask.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    /// The landmark configuration or the transform is degenerate.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A landmark coordinate is NaN or infinite.
    #[error("Landmark {0} has a non-finite coordinate")]
    NonFinite(usize),

    /// The wrong number of landmarks was supplied.
    #[error("Expected {expected} landmarks, got {actual}")]
    LandmarkCount {
        /// Number of landmarks required per image
        expected: usize,
        /// Number of landmarks supplied
        actual: usize,
    },

    /// The mask buffer could not be allocated.
    #[error(transparent)]
    Image(#[from] landmask_image::ImageError),
}
