use firemask_image::{Image, ImageError};

use crate::filter::kernels::{gaussian_kernel_1d, SOBEL_KERNEL_X, SOBEL_KERNEL_Y};
use crate::filter::{filter_2d_3x3, separable_filter};
use crate::threshold::MASK_FOREGROUND;

/// Kernel taps used for the sigma=1 smoothing pass (4 sigma radius).
const GAUSSIAN_KERNEL_SIZE: usize = 9;

/// Blur a single-channel image with a gaussian filter.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `kernel_size` - The number of taps of the 1D kernel.
/// * `sigma` - The sigma of the gaussian kernel.
pub fn gaussian_blur(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel_size: usize,
    sigma: f32,
) -> Result<(), ImageError> {
    let kernel = gaussian_kernel_1d(kernel_size, sigma);
    separable_filter(src, dst, &kernel, &kernel)
}

/// Horizontal and vertical sobel gradients of an image.
pub struct Gradients {
    /// Gradient along x.
    pub gx: Image<f32, 1>,
    /// Gradient along y.
    pub gy: Image<f32, 1>,
}

impl Gradients {
    /// Gradient magnitude `sqrt(gx^2 + gy^2)` per pixel.
    pub fn magnitude(&self) -> Result<Image<f32, 1>, ImageError> {
        let mut mag = Image::from_size_val(self.gx.size(), 0.0)?;
        crate::parallel::par_iter_rows_val_two(&self.gx, &self.gy, &mut mag, |&gx, &gy, dst| {
            *dst = (gx * gx + gy * gy).sqrt();
        });
        Ok(mag)
    }

    /// Gradient direction `atan2(gy, gx)` per pixel, in radians.
    pub fn direction(&self) -> Result<Image<f32, 1>, ImageError> {
        let mut dir = Image::from_size_val(self.gx.size(), 0.0)?;
        crate::parallel::par_iter_rows_val_two(&self.gx, &self.gy, &mut dir, |&gx, &gy, dst| {
            *dst = gy.atan2(gx);
        });
        Ok(dir)
    }
}

/// Compute the 3x3 sobel gradients of a single-channel image.
///
/// Same-size convolution with zero padding.
pub fn spatial_gradient(src: &Image<f32, 1>) -> Result<Gradients, ImageError> {
    let mut gx = Image::from_size_val(src.size(), 0.0)?;
    filter_2d_3x3(src, &mut gx, &SOBEL_KERNEL_X)?;

    let mut gy = Image::from_size_val(src.size(), 0.0)?;
    filter_2d_3x3(src, &mut gy, &SOBEL_KERNEL_Y)?;

    Ok(Gradients { gx, gy })
}

/// Binarize a raster by gradient-magnitude hysteresis.
///
/// The raster is smoothed with a sigma=1 gaussian, sobel gradients are
/// taken, and every pixel is classified by its gradient magnitude:
/// strong (`> high`) pixels become 255 immediately; weak pixels
/// (`low <= magnitude <= high`) strictly inside the border are promoted
/// to 255 when any pixel of their 3x3 magnitude neighborhood (center
/// included) exceeds `low`. The promotion is a single pass, not a
/// flood fill: weak pixels more than one hop from a supporting
/// magnitude stay suppressed. Border pixels are never weak-promoted.
///
/// `low >= high` is accepted and simply leaves the weak band empty.
///
/// # Examples
///
/// ```
/// use firemask_image::{Image, ImageSize};
/// use firemask_imgproc::edge::hysteresis_threshold;
///
/// // a flat image has zero gradient everywhere
/// let image = Image::<f32, 1>::from_size_val(
///     ImageSize { width: 8, height: 8 },
///     25.0,
/// ).unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// hysteresis_threshold(&image, &mut mask, 50.0, 150.0).unwrap();
/// assert!(mask.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn hysteresis_threshold(
    src: &Image<f32, 1>,
    dst: &mut Image<u8, 1>,
    low: f32,
    high: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let mut smoothed = Image::from_size_val(src.size(), 0.0)?;
    gaussian_blur(src, &mut smoothed, GAUSSIAN_KERNEL_SIZE, 1.0)?;

    let grads = spatial_gradient(&smoothed)?;
    let magnitude = grads.magnitude()?;
    let mag = magnitude.as_slice();

    let width = src.width();
    let height = src.height();
    let out = dst.as_slice_mut();

    // strong edges, border included
    for (dst_pixel, &m) in out.iter_mut().zip(mag) {
        *dst_pixel = if m > high { MASK_FOREGROUND } else { 0 };
    }

    // single-pass weak promotion over the interior
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let m = mag[y * width + x];
            if m < low || m > high {
                continue;
            }
            let supported = mag[(y - 1) * width + x - 1..=(y - 1) * width + x + 1]
                .iter()
                .chain(mag[y * width + x - 1..=y * width + x + 1].iter())
                .chain(mag[(y + 1) * width + x - 1..=(y + 1) * width + x + 1].iter())
                .any(|&n| n > low);
            if supported {
                out[y * width + x] = MASK_FOREGROUND;
            }
        }
    }

    Ok(())
}
