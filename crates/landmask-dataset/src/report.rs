use std::fmt;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::DatasetError;

/// An image a batch driver gave up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    /// File name of the image
    pub name: String,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of a batch driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of images written
    pub processed: usize,
    /// Images skipped, in processing order
    pub skipped: Vec<SkippedImage>,
}

impl BatchReport {
    /// Record a successfully processed image.
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    /// Record a skipped image and log the reason.
    pub fn record_skipped(&mut self, name: impl Into<String>, reason: impl fmt::Display) {
        let name = name.into();
        let reason = reason.to_string();
        log::warn!("skipping {name}: {reason}");
        self.skipped.push(SkippedImage { name, reason });
    }

    /// Total number of images seen.
    pub fn total(&self) -> usize {
        self.processed + self.skipped.len()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images processed, {} skipped",
            self.processed,
            self.skipped.len()
        )?;
        for skipped in &self.skipped {
            write!(f, "\n  {}: {}", skipped.name, skipped.reason)?;
        }
        Ok(())
    }
}

/// Progress bar over `len` images, hidden when `visible` is false.
pub(crate) fn progress_bar(len: usize, visible: bool) -> Result<ProgressBar, DatasetError> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} ({eta}) {msg}",
            )?
            .progress_chars("##>-"),
    );
    Ok(pb)
}
