#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// batch folder conversion and label checking.
pub mod batch;

/// Error types for the io module.
pub mod error;

/// single-file raster read/write functions.
pub mod functional;

/// optimal-threshold report writing.
pub mod report;

pub use crate::error::IoError;
