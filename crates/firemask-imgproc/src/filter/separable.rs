use firemask_image::{Image, ImageError};

/// Apply a separable filter to a single-channel image.
///
/// The border policy is replicate: out-of-range taps read the nearest
/// edge pixel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
pub fn separable_filter(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel_x: &[f32],
    kernel_y: &[f32],
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

    let half_x = kernel_x.len() / 2;
    let half_y = kernel_y.len() / 2;

    // horizontal pass
    let mut temp = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            for (k, &weight) in kernel_x.iter().enumerate() {
                let x_pos = (x + k).saturating_sub(half_x).min(width - 1);
                sum += src_data[y * width + x_pos] * weight;
            }
            temp[y * width + x] = sum;
        }
    }

    // vertical pass
    let dst_data = dst.as_slice_mut();
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            for (k, &weight) in kernel_y.iter().enumerate() {
                let y_pos = (y + k).saturating_sub(half_y).min(height - 1);
                sum += temp[y_pos * width + x] * weight;
            }
            dst_data[y * width + x] = sum;
        }
    }

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
                height: 2,
            },
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )?;
        let mut filtered = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        separable_filter(&image, &mut filtered, &[0.0, 1.0, 0.0], &[0.0, 1.0, 0.0])?;
        assert_eq!(filtered.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn constant_image_is_preserved_at_borders() -> Result<(), ImageError> {
        // replicate padding keeps a flat image flat, including edges
        let image = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            3.0,
        )?;
        let mut filtered = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        let kernel = crate::filter::kernels::gaussian_kernel_1d(5, 1.0);
        separable_filter(&image, &mut filtered, &kernel, &kernel)?;

        for &v in filtered.as_slice() {
            assert!((v - 3.0).abs() < 1e-5);
        }

        Ok(())
    }
}
