use std::path::{Path, PathBuf};

use landmask_image::ImageSize;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Layout and parameters of a landmark dataset.
///
/// Directory and file fields are relative to `root`. Every field has a
/// default, so a JSON config file only needs the values it changes:
///
/// ```json
/// { "root": "/data/dogs/", "output_size": [224, 224] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Dataset root, holding the annotation csv
    pub root: PathBuf,
    /// Source images
    pub images_dir: PathBuf,
    /// Output of the resize pass
    pub resized_dir: PathBuf,
    /// Output of the re-resize pass
    pub re_resized_dir: PathBuf,
    /// Output of the mask pass
    pub masks_dir: PathBuf,
    /// Labels of the resized images
    pub resized_labels: PathBuf,
    /// Labels of the re-resized images
    pub re_resized_labels: PathBuf,
    /// `[width, height]` of the resized images
    pub output_size: [usize; 2],
    /// `[width, height]` of the re-resized images
    pub re_resize_size: [usize; 2],
    /// Fraction of the images used for training
    pub split: f64,
    /// Quality of the written JPEG files, 1 to 100
    pub jpeg_quality: u8,
    /// Show a progress bar while processing
    pub show_progress: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("../data/landmarks/"),
            images_dir: PathBuf::from("images/"),
            resized_dir: PathBuf::from("resized/"),
            re_resized_dir: PathBuf::from("re_resized/"),
            masks_dir: PathBuf::from("masks/"),
            resized_labels: PathBuf::from("resized_labels.json"),
            re_resized_labels: PathBuf::from("re_resized_labels.json"),
            output_size: [500, 500],
            re_resize_size: [100, 100],
            split: 0.8,
            jpeg_quality: landmask_io::functional::DEFAULT_JPEG_QUALITY,
            show_progress: true,
        }
    }
}

impl DatasetConfig {
    /// Default layout under another root directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data).map_err(|e| {
            DatasetError::InvalidConfig(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the numeric parameters.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if !(0.0..=1.0).contains(&self.split) {
            return Err(DatasetError::InvalidConfig(format!(
                "split must be within [0, 1], got {}",
                self.split
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(DatasetError::InvalidConfig(format!(
                "jpeg_quality must be within [1, 100], got {}",
                self.jpeg_quality
            )));
        }
        for (name, [width, height]) in [
            ("output_size", self.output_size),
            ("re_resize_size", self.re_resize_size),
        ] {
            if width == 0 || height == 0 {
                return Err(DatasetError::InvalidConfig(format!(
                    "{name} must not be empty, got {width}x{height}"
                )));
            }
        }
        Ok(())
    }

    /// Directory of the source images.
    pub fn images_path(&self) -> PathBuf {
        self.root.join(&self.images_dir)
    }

    /// Directory of the resized images.
    pub fn resized_path(&self) -> PathBuf {
        self.root.join(&self.resized_dir)
    }

    /// Directory of the re-resized images.
    pub fn re_resized_path(&self) -> PathBuf {
        self.root.join(&self.re_resized_dir)
    }

    /// Directory of the masks.
    pub fn masks_path(&self) -> PathBuf {
        self.root.join(&self.masks_dir)
    }

    /// Label file of the resized images.
    pub fn resized_labels_path(&self) -> PathBuf {
        self.root.join(&self.resized_labels)
    }

    /// Label file of the re-resized images.
    pub fn re_resized_labels_path(&self) -> PathBuf {
        self.root.join(&self.re_resized_labels)
    }

    /// Size of the resized images.
    pub fn output_size(&self) -> ImageSize {
        self.output_size.into()
    }

    /// Size of the re-resized images.
    pub fn re_resize_size(&self) -> ImageSize {
        self.re_resize_size.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_file() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "root": "/data/dogs/", "output_size": [224, 112] }"#)?;

        let config = DatasetConfig::from_json_file(&path)?;
        assert_eq!(config.root, PathBuf::from("/data/dogs/"));
        assert_eq!(config.output_size(), [224, 112].into());
        assert_eq!(config.re_resize_size(), [100, 100].into());
        assert_eq!(config.masks_path(), PathBuf::from("/data/dogs/masks/"));
        assert_eq!(config.split, 0.8);
        Ok(())
    }

    #[test]
    fn invalid_values() -> Result<(), DatasetError> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("config.json");

        for body in [
            r#"{ "split": 1.5 }"#,
            r#"{ "jpeg_quality": 0 }"#,
            r#"{ "re_resize_size": [0, 10] }"#,
            r#"{ "split": "half" }"#,
        ] {
            std::fs::write(&path, body)?;
            let res = DatasetConfig::from_json_file(&path);
            assert!(matches!(res, Err(DatasetError::InvalidConfig(_))), "{body}");
        }
        Ok(())
    }

    #[test]
    fn default_layout() {
        let config = DatasetConfig::with_root("/tmp/set");
        assert_eq!(
            config.resized_labels_path(),
            PathBuf::from("/tmp/set/resized_labels.json")
        );
        assert!(config.validate().is_ok());
        assert!(DatasetConfig::default().validate().is_ok());
    }
}
