//! Filter operations
//!
//! This module provides the convolution primitives used by the edge
//! detection pipeline.

/// Filter kernels
pub mod kernels;

/// Separable filter operations
mod separable;
pub use separable::*;

/// Same-size 2D convolution
mod conv2d;
pub use conv2d::*;
