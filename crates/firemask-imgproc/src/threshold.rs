use firemask_image::{Image, ImageError};

use crate::edge;
use crate::error::ConfigError;
use crate::histogram::{HistogramStats, Quantization, NUM_BINS};
use crate::parallel;

/// Mask value written for foreground pixels.
pub const MASK_FOREGROUND: u8 = 255;

/// Apply a binary threshold to a single-channel raster.
///
/// Pixels strictly greater than `threshold` become 255, everything
/// else (including values equal to the threshold) becomes 0.
///
/// # Examples
///
/// ```
/// use firemask_image::{Image, ImageSize};
/// use firemask_imgproc::threshold::threshold_binary;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![5.0, 60.0],
/// ).unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// threshold_binary(&image, &mut mask, 50.0).unwrap();
/// assert_eq!(mask.as_slice(), [0, 255]);
/// ```
pub fn threshold_binary(
    src: &Image<f32, 1>,
    dst: &mut Image<u8, 1>,
    threshold: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            MASK_FOREGROUND
        } else {
            0
        };
    });

    Ok(())
}

/// Find the variance-maximizing split point of an intensity histogram.
///
/// For each bin `k` with `0 < cumulative_sum[k] < 1` the between-class
/// variance is
///
/// `bcv[k] = (cum_mean[255] * cum_sum[k] - cum_mean[k])^2
///           / (cum_sum[k] * (1 - cum_sum[k]) + eps)`
///
/// and the returned threshold is the argmax, ties resolved to the
/// lowest bin index. Bins with an empty class on either side are
/// excluded; if every bin is excluded the threshold is 0.
pub fn otsu_find_threshold(stats: &HistogramStats) -> u8 {
    let global_mean = stats.cumulative_mean[NUM_BINS - 1];

    let mut best_bcv = 0.0;
    let mut best_threshold = 0usize;

    for k in 0..NUM_BINS {
        let w = stats.cumulative_sum[k];
        if w <= 0.0 || w >= 1.0 {
            continue;
        }

        let diff = global_mean * w - stats.cumulative_mean[k];
        let bcv = diff * diff / (w * (1.0 - w) + f64::EPSILON);

        if bcv > best_bcv {
            best_bcv = bcv;
            best_threshold = k;
        }
    }

    best_threshold as u8
}

/// Apply Otsu's thresholding to a single-channel raster.
///
/// Computes the histogram statistics under the given quantization
/// policy, finds the optimal threshold and binarizes the original
/// (unquantized) raster values against it with a strict `>` compare.
///
/// # Returns
///
/// The chosen threshold, so batch callers can record it.
///
/// # Examples
///
/// ```
/// use firemask_image::{Image, ImageSize};
/// use firemask_imgproc::histogram::Quantization;
/// use firemask_imgproc::threshold::otsu_threshold;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 2, height: 3 },
///     vec![100.0, 200.0, 50.0, 150.0, 200.0, 250.0],
/// ).unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// let threshold = otsu_threshold(&image, &mut mask, Quantization::Thermal).unwrap();
/// assert_eq!(threshold, 100);
/// assert_eq!(mask.as_slice(), [0, 255, 0, 255, 255, 255]);
/// ```
pub fn otsu_threshold(
    src: &Image<f32, 1>,
    dst: &mut Image<u8, 1>,
    quantization: Quantization,
) -> Result<u8, ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let stats = HistogramStats::compute(src, quantization);
    let threshold = otsu_find_threshold(&stats);

    threshold_binary(src, dst, threshold as f32)?;

    Ok(threshold)
}

/// A binarization strategy: raster in, binary mask out.
///
/// This is a closed set; every strategy satisfies the same contract
/// and provides its own parameters, so an unrecognized mode cannot
/// reach the pipeline (string parsing fails early with a
/// [`ConfigError`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdMethod {
    /// Fixed binary threshold in raster units (e.g. degrees Celsius).
    Binary {
        /// Pixels strictly above this value become foreground.
        threshold: f32,
    },
    /// Gradient-magnitude hysteresis with two thresholds.
    Hysteresis {
        /// Lower magnitude bound of the weak-edge band.
        low: f32,
        /// Magnitudes above this are strong edges.
        high: f32,
    },
    /// Automatic threshold via between-class-variance maximization.
    Otsu {
        /// Quantization policy for the histogram.
        quantization: Quantization,
    },
}

/// Tunable parameters shared by the thresholding strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdOptions {
    /// Fixed threshold for [`ThresholdMethod::Binary`].
    pub binary_threshold: f32,
    /// Low threshold for [`ThresholdMethod::Hysteresis`].
    pub low_threshold: f32,
    /// High threshold for [`ThresholdMethod::Hysteresis`].
    pub high_threshold: f32,
    /// Use the thermal quantization policy for Otsu.
    pub thermal: bool,
}

impl Default for ThresholdOptions {
    fn default() -> Self {
        Self {
            binary_threshold: 50.0,
            low_threshold: 50.0,
            high_threshold: 150.0,
            thermal: false,
        }
    }
}

impl ThresholdMethod {
    /// Resolve a mode tag (`BINARY`, `HYST` or `OTSU`) into a strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownMode`] for any other tag.
    pub fn from_mode(mode: &str, opts: &ThresholdOptions) -> Result<Self, ConfigError> {
        match mode {
            "BINARY" => Ok(Self::Binary {
                threshold: opts.binary_threshold,
            }),
            "HYST" => Ok(Self::Hysteresis {
                low: opts.low_threshold,
                high: opts.high_threshold,
            }),
            "OTSU" => Ok(Self::Otsu {
                quantization: if opts.thermal {
                    Quantization::Thermal
                } else {
                    Quantization::Rounded
                },
            }),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }

    /// Produce a binary mask from a single-channel raster.
    ///
    /// # Returns
    ///
    /// `Some(threshold)` for the Otsu strategy, `None` otherwise.
    pub fn apply(
        &self,
        src: &Image<f32, 1>,
        dst: &mut Image<u8, 1>,
    ) -> Result<Option<u8>, ImageError> {
        match *self {
            Self::Binary { threshold } => {
                threshold_binary(src, dst, threshold)?;
                Ok(None)
            }
            Self::Hysteresis { low, high } => {
                edge::hysteresis_threshold(src, dst, low, high)?;
                Ok(None)
            }
            Self::Otsu { quantization } => Ok(Some(otsu_threshold(src, dst, quantization)?)),
        }
    }
}
