use crate::interpolation::InterpolationMode;
use fast_image_resize as fr;
use landmask_image::{Image, ImageError};

fn check_sizes(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) -> Result<(), ImageError> {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return Err(ImageError::InvalidImageSize(
            src_width, src_height, dst_width, dst_height,
        ));
    }
    Ok(())
}

/// Resize an rgb8 image to a new size using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// # Arguments
///
/// * `src` - The input image container with 3 channels.
/// * `dst` - The output image container, already allocated with the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use landmask_image::Image;
/// use landmask_imgproc::resize::resize_fast;
/// use landmask_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<_, 3>::new([4, 5].into(), vec![0u8; 4 * 5 * 3]).unwrap();
/// let mut image_resized = Image::<_, 3>::from_size_val([2, 3].into(), 0).unwrap();
///
/// resize_fast(&image, &mut image_resized, InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
///
/// # Errors
///
/// The function returns an error if the image cannot be resized.
pub fn resize_fast(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    check_sizes(src.width(), src.height(), dst.width(), dst.height())?;

    let [src_width, src_height]: [u32; 2] = src.size().into();
    let src_image = fr::images::ImageRef::new(
        src_width,
        src_height,
        src.as_slice(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| ImageError::ResampleError(e.to_string()))?;

    let [dst_width, dst_height]: [u32; 2] = dst.size().into();
    let mut dst_image = fr::images::Image::from_slice_u8(
        dst_width,
        dst_height,
        dst.as_slice_mut(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| ImageError::ResampleError(e.to_string()))?;

    let options = fr::ResizeOptions::new().resize_alg(match interpolation {
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
    });

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| ImageError::ResampleError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use landmask_image::{Image, ImageError};

    #[test]
    fn resize_rejects_empty() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([0, 0].into(), vec![])?;
        let mut image_resized = Image::<u8, 3>::from_size_val([2, 2].into(), 0)?;
        let res = super::resize_fast(
            &image,
            &mut image_resized,
            super::InterpolationMode::Nearest,
        );
        assert_eq!(res, Err(ImageError::InvalidImageSize(0, 0, 2, 2)));
        Ok(())
    }

    #[test]
    fn resize_fast() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new([4, 5].into(), vec![10u8; 4 * 5 * 3])?;

        let mut image_resized = Image::<_, 3>::from_size_val([2, 3].into(), 0)?;

        super::resize_fast(
            &image,
            &mut image_resized,
            super::InterpolationMode::Nearest,
        )?;

        assert_eq!(image_resized.size().width, 2);
        assert_eq!(image_resized.size().height, 3);
        assert!(image_resized.as_slice().iter().all(|&v| v == 10));
        Ok(())
    }

    #[test]
    fn resize_fast_bilinear_upscale() -> Result<(), ImageError> {
        // left half black, right half white
        let data = (0..4 * 2)
            .flat_map(|i| if i % 4 < 2 { [0u8; 3] } else { [255u8; 3] })
            .collect();
        let image = Image::<_, 3>::new([4, 2].into(), data)?;
        let mut image_resized = Image::<_, 3>::from_size_val([8, 4].into(), 0)?;

        super::resize_fast(
            &image,
            &mut image_resized,
            super::InterpolationMode::Bilinear,
        )?;

        let row = &image_resized.as_slice()[..8 * 3];
        assert_eq!(row[0], 0);
        assert_eq!(row[7 * 3], 255);
        // the edge is blended
        assert!(row.iter().any(|&v| v > 0 && v < 255));
        Ok(())
    }
}
