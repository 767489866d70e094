use firemask_image::{Image, ImageError};

use crate::parallel;

/// Define the RGB weights for the grayscale conversion.
const RW: f32 = 0.299;
const GW: f32 = 0.587;
const BW: f32 = 0.114;

/// Convert an RGB image to grayscale using the formula:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// This is the raster-preparation path for general (non-thermal)
/// imagery, which must be reduced to a single channel before
/// thresholding.
///
/// # Examples
///
/// ```
/// use firemask_image::{Image, ImageSize};
/// use firemask_imgproc::color::gray_from_rgb;
///
/// let image = Image::<f32, 3>::from_size_val(
///     ImageSize { width: 4, height: 5 },
///     1.0,
/// ).unwrap();
///
/// let mut gray = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
/// gray_from_rgb(&image, &mut gray).unwrap();
/// assert_eq!(gray.num_channels(), 1);
/// ```
pub fn gray_from_rgb(src: &Image<f32, 3>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = RW * src_pixel[0] + GW * src_pixel[1] + BW * src_pixel[2];
    });

    Ok(())
}
