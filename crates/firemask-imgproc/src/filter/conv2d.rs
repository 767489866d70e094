use firemask_image::{Image, ImageError};
use rayon::prelude::*;

/// Apply a 3x3 kernel to a single-channel image with zero padding.
///
/// The output has the same size as the input; taps falling outside the
/// image contribute zero.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `kernel` - The 3x3 kernel.
pub fn filter_2d_3x3(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel: &[[f32; 3]; 3],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let width = src.width();
    let height = src.height();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for (x, dst_pixel) in dst_row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for (ky, kernel_row) in kernel.iter().enumerate() {
                    let yy = y + ky;
                    if yy < 1 || yy > height {
                        continue;
                    }
                    let yy = yy - 1;
                    for (kx, &weight) in kernel_row.iter().enumerate() {
                        let xx = x + kx;
                        if xx < 1 || xx > width {
                            continue;
                        }
                        sum += src_data[yy * width + (xx - 1)] * weight;
                    }
                }
                *dst_pixel = sum;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use firemask_image::ImageSize;

    #[test]
    fn identity_kernel_is_noop() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        )?;
        let mut filtered = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        let identity = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        filter_2d_3x3(&image, &mut filtered, &identity)?;
        assert_eq!(filtered.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn sobel_x_on_vertical_step() -> Result<(), ImageError> {
        // a vertical step edge yields a horizontal gradient response in
        // the interior columns adjacent to the step
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 4,
                height: 3,
            },
            vec![
                0.0, 0.0, 1.0, 1.0, //
                0.0, 0.0, 1.0, 1.0, //
                0.0, 0.0, 1.0, 1.0,
            ],
        )?;
        let mut gx = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        filter_2d_3x3(&image, &mut gx, &crate::filter::kernels::SOBEL_KERNEL_X)?;

        // middle row, columns 1 and 2 straddle the step
        assert_eq!(gx.as_slice()[4 + 1], 4.0);
        assert_eq!(gx.as_slice()[4 + 2], 4.0);

        Ok(())
    }

    #[test]
    fn zero_padding_flat_image_responds_at_border() -> Result<(), ImageError> {
        // zero padding makes a flat non-zero image produce border
        // responses for a smoothing kernel, and none in the interior
        let image = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            1.0,
        )?;
        let mut out = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        filter_2d_3x3(&image, &mut out, &crate::filter::kernels::SOBEL_KERNEL_X)?;

        // interior: antisymmetric kernel cancels on a flat image
        assert_eq!(out.as_slice()[2 * 5 + 2], 0.0);
        // left border column sees zeros outside, so the response is non-zero
        assert!(out.as_slice()[2 * 5].abs() > 0.0);

        Ok(())
    }
}
