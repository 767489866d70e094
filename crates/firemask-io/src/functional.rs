use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tiff::decoder::DecodingResult;
use tiff::encoder::{colortype, TiffEncoder};

use firemask_image::{Image, ImageSize};

use crate::error::IoError;

const TIFF_EXTENSIONS: [&str; 2] = ["tiff", "tif"];

fn check_exists(file_path: &Path) -> Result<(), IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    Ok(())
}

/// Whether a path carries one of the raster extensions the batch
/// pipeline accepts (`tiff`, `tif`, `jpg`, `jpeg`).
pub fn has_raster_extension(file_path: &Path) -> bool {
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            TIFF_EXTENSIONS.contains(&ext.as_str()) || ext == "jpg" || ext == "jpeg"
        })
        .unwrap_or(false)
}

fn is_tiff(file_path: &Path) -> bool {
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TIFF_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn read_image_tiff_impl(file_path: &Path) -> Result<(DecodingResult, ImageSize), IoError> {
    check_exists(file_path)?;

    if !is_tiff(file_path) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = File::open(file_path)?;
    let mut decoder = tiff::decoder::Decoder::new(BufReader::new(file))?;
    let (width, height) = decoder.dimensions()?;
    let result = decoder.read_image()?;

    Ok((
        result,
        ImageSize {
            width: width as usize,
            height: height as usize,
        },
    ))
}

/// Read a single-channel TIFF image as unsigned 8-bit.
///
/// # Arguments
///
/// * `file_path` - The path to the TIFF image.
///
/// # Returns
///
/// The Gray8 typed image.
pub fn read_image_tiff_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    let (result, size) = read_image_tiff_impl(file_path)?;

    let data = match result {
        DecodingResult::U8(data) => data,
        _ => return Err(IoError::UnsupportedTiffFormat(file_path.to_path_buf())),
    };

    Ok(Image::new(size, data)?)
}

/// Read a single-channel TIFF image as 32-bit float.
///
/// Integer (8- or 16-bit) sample formats are widened; float samples
/// are taken as-is. This is the entry point for thermal rasters whose
/// pixel values are degree-like numbers.
pub fn read_image_tiff_monof32(file_path: impl AsRef<Path>) -> Result<Image<f32, 1>, IoError> {
    let file_path = file_path.as_ref();
    let (result, size) = read_image_tiff_impl(file_path)?;

    let data = match result {
        DecodingResult::F32(data) => data,
        DecodingResult::U8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f32::from).collect(),
        _ => return Err(IoError::UnsupportedTiffFormat(file_path.to_path_buf())),
    };

    Ok(Image::new(size, data)?)
}

/// Read any supported image format (JPEG, PNG, TIFF, ...) as RGB8.
///
/// # Arguments
///
/// * `file_path` - The path to the image.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    check_exists(file_path)?;

    let rgb = image::open(file_path)?.to_rgb8();
    let size = ImageSize {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
    };

    Ok(Image::new(size, rgb.into_raw())?)
}

/// Write a single-channel 8-bit image (binary mask or label map) as TIFF.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to encode.
pub fn write_image_tiff_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    let file = File::create(file_path.as_ref())?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;

    encoder.write_image::<colortype::Gray8>(
        image.width() as u32,
        image.height() as u32,
        image.as_slice(),
    )?;

    Ok(())
}

/// Build the output path for a converted raster.
///
/// Single-image conversions record their threshold in the name as
/// `<base>_<suffix>.tiff`; folder conversions pass no suffix and get
/// `<base>.tiff`, which is the name the labeling stage looks up.
pub fn mask_output_path(output_dir: &Path, input_path: &Path, suffix: Option<&str>) -> PathBuf {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mask");

    let file_name = match suffix {
        Some(s) => format!("{stem}_{s}.tiff"),
        None => format!("{stem}.tiff"),
    };

    output_dir.join(file_name)
}
