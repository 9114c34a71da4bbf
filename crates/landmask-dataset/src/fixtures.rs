//! Small on-disk datasets for the driver tests.

use std::path::Path;

use landmask_image::Image;
use landmask_io::functional::{write_image_rgb8, DEFAULT_JPEG_QUALITY};

use crate::config::DatasetConfig;
use crate::error::DatasetError;

/// Landmarks of an upright face centered in a 50x50 image.
pub const FACE: [[f64; 2]; 7] = [
    [12.0, 14.0],
    [16.0, 24.0],
    [20.0, 20.0],
    [24.0, 24.0],
    [28.0, 14.0],
    [20.0, 40.0],
    [20.0, 0.0],
];

const HEADER: &str = "filename,file_size,file_attributes,region_count,region_id,region_shape_attributes,region_attributes";

/// VIA csv rows for one image.
pub fn via_rows(filename: &str, points: &[[f64; 2]]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, [x, y])| {
            format!(
                "{filename},0,\"{{}}\",{},{i},\"{{\"\"name\"\":\"\"point\"\",\"\"cx\"\":{x},\"\"cy\"\":{y}}}\",\"{{}}\"\n",
                points.len()
            )
        })
        .collect()
}

/// An rgb8 gradient.
pub fn gradient(width: usize, height: usize) -> Result<Image<u8, 3>, DatasetError> {
    let data = (0..height)
        .flat_map(|y| (0..width).flat_map(move |x| [(x * 5) as u8, (y * 5) as u8, 128]))
        .collect();
    Ok(Image::new([width, height].into(), data)?)
}

/// Write `images` (name, width, height) and an annotation csv with `csv_body`
/// under `root`, and return the matching config.
pub fn dataset(
    root: &Path,
    images: &[(&str, usize, usize)],
    csv_body: &str,
) -> Result<DatasetConfig, DatasetError> {
    let mut config = DatasetConfig::with_root(root);
    config.show_progress = false;

    std::fs::create_dir_all(config.images_path())?;
    for &(name, width, height) in images {
        write_image_rgb8(
            config.images_path().join(name),
            &gradient(width, height)?,
            DEFAULT_JPEG_QUALITY,
        )?;
    }
    std::fs::write(root.join("via_export.csv"), format!("{HEADER}\n{csv_body}"))?;

    Ok(config)
}
