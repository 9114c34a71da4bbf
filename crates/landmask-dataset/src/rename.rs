use std::path::{Path, PathBuf};

use indicatif::ProgressIterator;
use landmask_io::functional as F;

use crate::config::DatasetConfig;
use crate::error::DatasetError;
use crate::report::{progress_bar, BatchReport};

/// Staging directory used while renaming, inside the renamed directory.
const STAGING_DIR: &str = ".landmask-rename";

fn is_jpeg(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_ascii_lowercase();
        ext == "jpg" || ext == "jpeg"
    })
}

/// Move one image into the staging directory as `<index>.jpg`.
///
/// JPEG files with a readable header are moved as they are, other formats
/// are re-encoded.
fn stage(src: &Path, staged: &Path, quality: u8) -> Result<(), DatasetError> {
    if is_jpeg(src) {
        F::read_image_size(src)?;
        std::fs::rename(src, staged)?;
    } else {
        let image = F::read_image_any_rgb8(src)?;
        F::write_image_rgb8(staged, &image, quality)?;
        std::fs::remove_file(src)?;
    }
    Ok(())
}

/// Renumber the images of `dir` to `0.jpg`, `1.jpg`, ... in sorted order.
///
/// Files with a numeric stem keep their relative order and come first. The
/// rename runs in two phases: every image is first moved to a staging
/// directory, then moved back under its new name, so no image overwrites
/// another. Files that cannot be decoded as images stay in place and are
/// reported as skipped.
///
/// # Errors
///
/// [`DatasetError::RenameConflict`] when a new name is taken by a skipped
/// file. The images not yet moved back remain in the staging directory.
pub fn rename_dataset(
    config: &DatasetConfig,
    dir: impl AsRef<Path>,
) -> Result<BatchReport, DatasetError> {
    config.validate()?;

    let dir = dir.as_ref();
    let files = F::list_files_sorted(dir)?;
    let staging = dir.join(STAGING_DIR);
    std::fs::create_dir_all(&staging)?;

    log::info!("renaming {} files in {}", files.len(), dir.display());

    let mut report = BatchReport::default();
    let mut staged = Vec::<PathBuf>::with_capacity(files.len());

    let pb = progress_bar(files.len(), config.show_progress)?;
    for src in files.iter().progress_with(pb) {
        let name = src
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let staged_path = staging.join(format!("{}.jpg", staged.len()));
        match stage(src, &staged_path, config.jpeg_quality) {
            Ok(()) => staged.push(staged_path),
            Err(e) => report.record_skipped(name, e),
        }
    }

    for (i, staged_path) in staged.iter().enumerate() {
        let dst = dir.join(format!("{i}.jpg"));
        if dst.exists() {
            return Err(DatasetError::RenameConflict(dst));
        }
        std::fs::rename(staged_path, &dst)?;
        report.record_processed();
    }

    std::fs::remove_dir(&staging)?;
    log::info!("rename: {report}");

    Ok(report)
}
