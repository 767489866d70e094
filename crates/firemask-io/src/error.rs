/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open or manipulate the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error with TIFF encoding/decoding.
    #[error("Error with Tiff encoding/decoding. {0}")]
    TiffError(#[from] tiff::TiffError),

    /// The TIFF sample format is not supported by this pipeline.
    #[error("Unsupported TIFF sample format in {0}")]
    UnsupportedTiffFormat(std::path::PathBuf),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] firemask_image::ImageError),

    /// Error during fire-range labeling.
    #[error("Failed to label image. {0}")]
    LabelingError(#[from] firemask_imgproc::labeling::LabelingError),

    /// Error writing the threshold report.
    #[error("Failed to write the report. {0}")]
    CsvError(#[from] csv::Error),
}
