use std::path::Path;

use landmask_dataset::{
    compute_masks, load_resized_dataset, re_resize_dataset, rename_dataset, resize_dataset,
    DatasetConfig, DatasetError,
};
use landmask_image::Image;
use landmask_io::functional::{read_image_any_rgb8, write_image_rgb8};

const HEADER: &str = "filename,file_size,file_attributes,region_count,region_id,region_shape_attributes,region_attributes";

/// Landmarks of an upright face filling most of a 100x80 image.
fn face(dx: f64) -> [[f64; 2]; 7] {
    [
        [30.0 + dx, 25.0],
        [40.0 + dx, 45.0],
        [50.0 + dx, 40.0],
        [60.0 + dx, 45.0],
        [70.0 + dx, 25.0],
        [50.0 + dx, 70.0],
        [50.0 + dx, 10.0],
    ]
}

fn via_rows(filename: &str, points: &[[f64; 2]]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, [x, y])| {
            // python-style quoting, as some exports have
            format!(
                "{filename},0,{{}},{},{i},\"{{'name': 'point', 'cx': {x}, 'cy': {y}}}\",{{}}\n",
                points.len()
            )
        })
        .collect()
}

fn write_dataset(root: &Path, count: usize) -> Result<DatasetConfig, DatasetError> {
    let mut config = DatasetConfig::with_root(root);
    config.show_progress = false;
    config.output_size = [50, 40];
    config.re_resize_size = [25, 20];
    config.split = 0.75;

    std::fs::create_dir_all(config.images_path())?;

    let mut csv = format!("{HEADER}\n");
    for i in 0..count {
        let name = format!("dog_{i}.png");
        let data = (0..100 * 80)
            .flat_map(|p| [(p % 100) as u8, (p / 100) as u8, (i * 40) as u8])
            .collect();
        write_image_rgb8(
            config.images_path().join(&name),
            &Image::new([100, 80].into(), data)?,
            config.jpeg_quality,
        )?;
        csv.push_str(&via_rows(&name, &face(i as f64 - 2.0)));
    }
    std::fs::write(root.join("annotations.csv"), csv)?;

    Ok(config)
}

#[test]
fn masks_for_every_annotated_image() -> Result<(), DatasetError> {
    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path(), 4)?;

    let report = compute_masks(&config)?;
    assert_eq!(report.processed, 4);
    assert!(report.skipped.is_empty());

    for i in 0..4 {
        let mask = read_image_any_rgb8(config.masks_path().join(format!("dog_{i}.png")))?;
        assert_eq!(mask.size(), [100, 80].into());

        let values = mask.channel(0)?.into_vec();
        let inside = values.iter().filter(|&&v| v == 255).count();
        // the face square has a side of 60 pixels
        let expected = 60.0 * 60.0;
        assert!((inside as f64 - expected).abs() < 0.1 * expected, "{inside}");
    }
    Ok(())
}

#[test]
fn full_preparation_pipeline() -> Result<(), DatasetError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let tmp_dir = tempfile::tempdir()?;
    let config = write_dataset(tmp_dir.path(), 4)?;

    assert_eq!(resize_dataset(&config)?.processed, 4);
    assert_eq!(re_resize_dataset(&config)?.processed, 4);

    let report = rename_dataset(&config, config.re_resized_path())?;
    assert_eq!(report.processed, 4);

    let split = load_resized_dataset(&config)?;
    assert_eq!(split.num_train(), 3);
    assert_eq!(split.num_valid(), 1);
    assert_eq!(split.train_images[0].size(), [50, 40].into());

    // the top landmark of the last image: (51, 10) scaled by (0.5, 0.5)
    let top = split.valid_labels[0][6];
    assert!((top.x - 25.5).abs() < 1e-9);
    assert!((top.y - 5.0).abs() < 1e-9);
    Ok(())
}
