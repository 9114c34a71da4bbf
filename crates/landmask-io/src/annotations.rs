use std::path::{Path, PathBuf};

use landmask_align::{LandmarkSet, Point2, NUM_LANDMARKS};
use serde::Deserialize;

use crate::error::IoError;

/// One landmark row of a VIA csv export.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    /// Image file name, relative to the images directory
    pub filename: String,
    /// Number of regions annotated on the image
    pub region_count: usize,
    /// Raw `region_shape_attributes` value, e.g. `{"name":"point","cx":12,"cy":40}`
    pub shape_attributes: String,
    /// Line of the record in the csv file
    pub line: u64,
}

impl AnnotationRecord {
    /// Landmark position in pixels, parsed from the shape attributes.
    ///
    /// # Errors
    ///
    /// [`IoError::Annotation`] when the attributes are not an object with
    /// numeric `cx` and `cy`, e.g. the `{}` row of an unannotated image.
    pub fn point(&self) -> Result<Point2, IoError> {
        parse_shape_attributes(&self.shape_attributes, self.line)
    }
}

/// The landmarks of one annotated image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedImage {
    /// Image file name, relative to the images directory
    pub filename: String,
    /// The 7 landmarks in annotation order
    pub landmarks: LandmarkSet,
}

#[derive(Deserialize)]
struct ViaRow {
    filename: String,
    region_count: String,
    region_shape_attributes: String,
}

#[derive(Deserialize)]
struct ShapeAttributes {
    cx: f64,
    cy: f64,
}

/// Parse a `region_shape_attributes` value such as `{"name":"point","cx":12,"cy":40}`.
///
/// Python-style single quotes are accepted as well.
fn parse_shape_attributes(raw: &str, line: u64) -> Result<Point2, IoError> {
    let normalized = raw.trim().replace('\'', "\"");
    let attrs: ShapeAttributes =
        serde_json::from_str(&normalized).map_err(|e| IoError::Annotation {
            line,
            reason: format!("invalid region_shape_attributes {raw:?}: {e}"),
        })?;
    Ok(Point2::new(attrs.cx, attrs.cy))
}

/// Read the landmark rows of a VIA csv export.
///
/// The file must have a header with at least the `filename`, `region_count`
/// and `region_shape_attributes` columns. Other columns are ignored. Shape
/// attributes are kept as text and only parsed by [`group_landmarks`], so
/// rows of unannotated images or non-point shapes can be filtered out first.
///
/// # Errors
///
/// [`IoError::Annotation`] for a record with a missing column or a
/// non-numeric `region_count`.
pub fn read_via_csv(file_path: impl AsRef<Path>) -> Result<Vec<AnnotationRecord>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(file_path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        let row: ViaRow = record
            .deserialize(Some(&headers))
            .map_err(|e| IoError::Annotation {
                line,
                reason: e.to_string(),
            })?;

        let region_count = row
            .region_count
            .trim()
            .parse()
            .map_err(|_| IoError::Annotation {
                line,
                reason: format!("invalid region_count {:?}", row.region_count),
            })?;

        records.push(AnnotationRecord {
            filename: row.filename,
            region_count,
            shape_attributes: row.region_shape_attributes,
            line,
        });
    }

    log::debug!(
        "read {} annotation records from {}",
        records.len(),
        file_path.display()
    );

    Ok(records)
}

/// Group consecutive landmark rows into images of 7 landmarks.
///
/// With `filter_complete`, rows of images whose `region_count` is not 7 are
/// dropped before grouping. A trailing group with fewer than 7 rows is ignored.
///
/// # Errors
///
/// [`IoError::Annotation`] when the 7 rows of a group name different files
/// or a kept row does not hold a point.
pub fn group_landmarks(
    records: &[AnnotationRecord],
    filter_complete: bool,
) -> Result<Vec<AnnotatedImage>, IoError> {
    let kept = records
        .iter()
        .filter(|r| !filter_complete || r.region_count == NUM_LANDMARKS)
        .collect::<Vec<_>>();

    let chunks = kept.chunks_exact(NUM_LANDMARKS);
    if !chunks.remainder().is_empty() {
        log::warn!(
            "ignoring {} trailing annotation rows that do not form a full image",
            chunks.remainder().len()
        );
    }

    chunks
        .map(|group| {
            let first = group[0];
            if let Some(other) = group.iter().find(|r| r.filename != first.filename) {
                return Err(IoError::Annotation {
                    line: other.line,
                    reason: format!(
                        "expected a landmark of {:?}, found one of {:?}",
                        first.filename, other.filename
                    ),
                });
            }

            let points = group
                .iter()
                .map(|r| r.point())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AnnotatedImage {
                filename: first.filename.clone(),
                landmarks: LandmarkSet::try_from(points)?,
            })
        })
        .collect()
}

/// Find the annotation csv of a dataset: the first `*.csv` file of `dir` in
/// lexicographic order.
pub fn find_csv(dir: impl AsRef<Path>) -> Result<PathBuf, IoError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(IoError::FileDoesNotExist(dir.to_path_buf()));
    }

    let mut candidates = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
        .collect::<Vec<_>>();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| IoError::AnnotationFileNotFound(dir.to_path_buf()))
}

/// Read and group the annotations of a dataset directory.
pub fn load_annotations(
    dir: impl AsRef<Path>,
    filter_complete: bool,
) -> Result<Vec<AnnotatedImage>, IoError> {
    let csv_path = find_csv(dir)?;
    log::info!("loading annotations from {}", csv_path.display());
    group_landmarks(&read_via_csv(csv_path)?, filter_complete)
}
