#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// edge detection via gradient hysteresis.
pub mod edge;

/// configuration error types.
pub mod error;

/// image filtering module.
pub mod filter;

/// compute image histogram statistics module.
pub mod histogram;

/// fire-range labeling module.
pub mod labeling;

/// module containing parallelization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;

pub use crate::error::ConfigError;
