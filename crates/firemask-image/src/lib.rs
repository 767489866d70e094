#![deny(missing_docs)]
//! Raster container and error types for the firemask pipeline

/// raster representation for thermal imagery.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
