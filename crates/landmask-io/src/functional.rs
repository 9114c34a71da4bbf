use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use image::{codecs::jpeg::JpegEncoder, ExtendedColorType, ImageEncoder};
use landmask_image::{Image, ImageSize};

use crate::error::IoError;

/// Default quality used when writing JPEG files.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

fn check_exists(file_path: &Path) -> Result<(), IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    Ok(())
}

fn is_jpeg(file_path: &Path) -> bool {
    file_path.extension().is_some_and(|ext| {
        let ext = ext.to_ascii_lowercase();
        ext == "jpg" || ext == "jpeg"
    })
}

/// Reads an image from the given file path as rgb8.
///
/// The method reads any image format supported by the image crate.
/// Grayscale and alpha images are converted to three channels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image with three channels _(rgb8)_.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    check_exists(file_path)?;

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Reads the size of an image without decoding its pixels.
pub fn read_image_size(file_path: impl AsRef<Path>) -> Result<ImageSize, IoError> {
    let file_path = file_path.as_ref();
    check_exists(file_path)?;

    let (width, height) = image::image_dimensions(file_path)?;

    Ok(ImageSize {
        width: width as usize,
        height: height as usize,
    })
}

fn write_image_impl<const C: usize>(
    file_path: &Path,
    image: &Image<u8, C>,
    color_type: ExtendedColorType,
    quality: u8,
) -> Result<(), IoError> {
    let (width, height) = (image.width() as u32, image.height() as u32);

    if is_jpeg(file_path) {
        let writer = BufWriter::new(File::create(file_path)?);
        let encoder = JpegEncoder::new_with_quality(writer, quality);
        encoder.write_image(image.as_slice(), width, height, color_type)?;
    } else {
        image::save_buffer(file_path, image.as_slice(), width, height, color_type)?;
    }

    Ok(())
}

/// Writes an rgb8 image to the given file path.
///
/// The format is taken from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
/// * `quality` - The JPEG quality, from 0 (lowest) to 100 (highest). Ignored by other formats.
pub fn write_image_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_impl(file_path.as_ref(), image, ExtendedColorType::Rgb8, quality)
}

/// Writes a grayscale image to the given file path.
///
/// The format is taken from the file extension. Prefer a lossless format
/// such as PNG for masks.
pub fn write_image_mono8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_impl(file_path.as_ref(), image, ExtendedColorType::L8, quality)
}

/// Numeric value of a file stem, e.g. `12` for `12.jpg`.
pub fn numeric_stem(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

/// Lists the regular files of a directory (not recursive).
///
/// Files with a numeric stem come first in numeric order (`2.jpg` before
/// `10.jpg`), followed by the other files in lexicographic order.
pub fn list_files_sorted(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    check_exists(dir)?;

    let mut files = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();

    files.sort_by(|a, b| match (numeric_stem(a), numeric_stem(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    });

    Ok(files)
}
