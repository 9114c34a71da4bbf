use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use landmask_align::LandmarkSet;

use crate::error::IoError;

/// Writes landmark labels to a JSON file.
///
/// The file holds one entry per image, each a list of 7 `[x, y]` pairs.
///
/// # Arguments
///
/// * `file_path` - The path to the output file.
/// * `labels` - The labels, in image order.
pub fn write_labels(file_path: impl AsRef<Path>, labels: &[LandmarkSet]) -> Result<(), IoError> {
    let mut writer = BufWriter::new(File::create(file_path.as_ref())?);
    serde_json::to_writer(&mut writer, labels)?;
    writer.flush()?;
    Ok(())
}

/// Reads landmark labels written by [`write_labels`].
pub fn read_labels(file_path: impl AsRef<Path>) -> Result<Vec<LandmarkSet>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(file_path)?);
    let labels: Vec<LandmarkSet> = serde_json::from_reader(reader)?;

    log::debug!("read {} labels from {}", labels.len(), file_path.display());

    Ok(labels)
}
