use crate::error::ImageError;

/// Image size in pixels
///
/// # Examples
///
/// ```
/// use firemask_image::ImageSize;
///
/// let size = ImageSize { width: 10, height: 20 };
/// assert_eq!(size.width, 10);
/// assert_eq!(size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents a raster with pixel data laid out row-major as (H, W, C).
///
/// `C` is the number of channels; single-channel thermal rasters use
/// `Image<f32, 1>` or `Image<u8, 1>`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const C: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const C: usize> Image<T, C> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data, length `width * height * C`.
    ///
    /// # Errors
    ///
    /// If the data length does not match the image size, or the size is
    /// zero, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use firemask_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::new(
    ///     ImageSize { width: 2, height: 3 },
    ///     vec![0u8; 2 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 2);
    /// assert_eq!(image.size().height, 3);
    /// assert_eq!(image.num_channels(), 1);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::ZeroImageSize(size.width, size.height));
        }

        if data.len() != size.width * size.height * C {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * C,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and a constant pixel value.
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * C];
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        C
    }

    /// Get the pixel data as a flat slice in (H, W, C) order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable flat slice in (H, W, C) order.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return the underlying pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get a pixel value at `(x, y)` for the given channel.
    ///
    /// # Errors
    ///
    /// If the coordinates or channel are out of bounds, an error is
    /// returned.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<&T, ImageError> {
        if ch >= C {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, C));
        }
        if x >= self.size.width || y >= self.size.height {
            return Err(ImageError::InvalidImageSize(
                x,
                y,
                self.size.width,
                self.size.height,
            ));
        }
        Ok(&self.data[(y * self.size.width + x) * C + ch])
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Returns
    ///
    /// A new image with the pixel data cast to the given type.
    pub fn cast<U>(&self) -> Result<Image<U, C>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }

    /// Get a single channel of the image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Copy,
    {
        if channel >= C {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, C));
        }

        let channel_data = self
            .data
            .iter()
            .skip(channel)
            .step_by(C)
            .copied()
            .collect::<Vec<T>>();

        Image::new(self.size, channel_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_new() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![1, 2, 3, 4, 5, 6],
        )?;

        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 3);
        assert_eq!(image.num_channels(), 1);
        assert_eq!(image.as_slice(), [1, 2, 3, 4, 5, 6]);

        Ok(())
    }

    #[test]
    fn image_new_wrong_shape() {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0; 5],
        );
        assert!(matches!(image, Err(ImageError::InvalidChannelShape(5, 6))));
    }

    #[test]
    fn image_new_zero_size() {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 0,
                height: 3,
            },
            vec![],
        );
        assert!(matches!(image, Err(ImageError::ZeroImageSize(0, 3))));
    }

    #[test]
    fn image_from_size_val() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 2,
            },
            1.5,
        )?;
        assert_eq!(image.as_slice(), [1.5; 8]);
        Ok(())
    }

    #[test]
    fn image_get_pixel() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![10, 20, 30, 40],
        )?;
        assert_eq!(image.get_pixel(1, 0, 0)?, &20);
        assert_eq!(image.get_pixel(0, 1, 0)?, &30);
        assert!(image.get_pixel(0, 0, 1).is_err());
        Ok(())
    }

    #[test]
    fn image_cast() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![7, 250],
        )?;
        let casted = image.cast::<f32>()?;
        assert_eq!(casted.as_slice(), [7.0, 250.0]);
        Ok(())
    }

    #[test]
    fn image_channel() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1, 2, 3, 4, 5, 6],
        )?;
        let green = image.channel(1)?;
        assert_eq!(green.as_slice(), [2, 5]);
        assert!(image.channel(3).is_err());
        Ok(())
    }
}
