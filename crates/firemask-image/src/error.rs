/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is zero.
    #[error("Image size must be non-zero, got {0}x{1}")]
    ZeroImageSize(usize, usize),

    /// Error when the image sizes of an operation do not match.
    #[error("Source image size ({0}x{1}) does not match destination ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast pixel value")]
    CastError,

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),
}
