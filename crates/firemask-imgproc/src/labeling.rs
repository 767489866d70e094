use firemask_image::{Image, ImageError};

use crate::error::ConfigError;
use crate::threshold::MASK_FOREGROUND;

/// Default additive tolerance used when matching values to boundaries.
pub const DEFAULT_LABEL_TOLERANCE: f64 = 0.3;

/// Decimal places the boundary breakpoints are rounded to.
///
/// A stability choice against floating drift, not a precision
/// requirement.
const BOUNDARY_DECIMAL_PLACES: i32 = 14;

/// Errors produced by the labeling stage.
#[derive(thiserror::Error, Debug)]
pub enum LabelingError {
    /// Raster and mask shapes are incompatible.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The labeling parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Summary of one labeling run.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelingSummary {
    /// The `num_classes + 1` breakpoints spanning the fire value range,
    /// empty when the mask contains no fire pixels.
    pub boundaries: Vec<f64>,
    /// Number of fire pixels labeled.
    pub fire_pixels: usize,
    /// Number of fire values that matched no boundary interval even
    /// with tolerance and were force-assigned to the nearest class.
    pub anomalies: usize,
}

fn round_boundary(x: f64) -> f64 {
    let factor = 10f64.powi(BOUNDARY_DECIMAL_PLACES);
    (x * factor).round() / factor
}

/// Partition the observed fire value range into equal-width bins.
///
/// Returns `num_classes + 1` monotonically non-decreasing breakpoints
/// with `boundaries[0] == min` and `boundaries[last] == max`, each
/// rounded to 14 decimal places.
///
/// An all-constant value set collapses every breakpoint onto the same
/// point, which is still a valid (degenerate) partition.
pub fn divide_range(fire_values: &[f64], num_classes: usize) -> Vec<f64> {
    let Some(&first) = fire_values.first() else {
        return Vec::new();
    };

    let (min_fire, max_fire) = fire_values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let interval = (max_fire - min_fire) / num_classes as f64;

    (0..=num_classes)
        .map(|i| round_boundary(min_fire + i as f64 * interval))
        .collect()
}

/// Assign a value to its class interval, scanning boundaries in order.
///
/// The last interval is closed above with an additive tolerance; every
/// interval's lower bound is relaxed by the same tolerance. The first
/// matching interval wins.
fn assign_class(value: f64, boundaries: &[f64], tolerance: f64) -> Option<usize> {
    let num_classes = boundaries.len() - 1;
    for i in 0..num_classes {
        let lower = boundaries[i];
        let upper = boundaries[i + 1];
        if i == num_classes - 1 {
            if lower <= value && value <= upper + tolerance {
                return Some(i + 1);
            }
        } else if lower - tolerance <= value && value < upper {
            return Some(i + 1);
        }
    }
    None
}

/// Class of the breakpoint nearest to an out-of-range value.
fn nearest_class(value: f64, boundaries: &[f64]) -> usize {
    let num_classes = boundaries.len() - 1;
    let mut best = 0usize;
    let mut best_dist = f64::INFINITY;
    for (i, &b) in boundaries.iter().enumerate() {
        let d = (value - b).abs();
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best.clamp(1, num_classes)
}

/// Rewrite every fire pixel of a raster with its severity class.
///
/// Fire pixels are those the binary mask marks 255. Their raster
/// values are partitioned into `num_classes` equal-width bins and each
/// pixel receives its bin index in `[1, num_classes]`; every other
/// pixel is 0 (background). The input raster and mask are untouched.
///
/// A fire value matching no interval even with tolerance is an
/// anomaly: it is force-assigned to the class of the nearest
/// breakpoint, reported through `log::warn!` with its coordinate, and
/// counted in the summary.
///
/// # Examples
///
/// ```
/// use firemask_image::{Image, ImageSize};
/// use firemask_imgproc::labeling::{label_fire_regions, DEFAULT_LABEL_TOLERANCE};
///
/// let size = ImageSize { width: 4, height: 2 };
/// let raster = Image::<f32, 1>::new(
///     size,
///     vec![10.0, 10.0, 20.0, 20.0, 30.0, 30.0, 1.0, 1.0],
/// ).unwrap();
/// let mask = Image::<u8, 1>::new(
///     size,
///     vec![255, 255, 255, 255, 255, 255, 0, 0],
/// ).unwrap();
///
/// let (labels, summary) =
///     label_fire_regions(&raster, &mask, 3, DEFAULT_LABEL_TOLERANCE).unwrap();
///
/// assert_eq!(labels.as_slice(), [1, 1, 2, 2, 3, 3, 0, 0]);
/// assert_eq!(summary.fire_pixels, 6);
/// assert_eq!(summary.anomalies, 0);
/// ```
pub fn label_fire_regions(
    raster: &Image<f32, 1>,
    mask: &Image<u8, 1>,
    num_classes: usize,
    tolerance: f64,
) -> Result<(Image<u8, 1>, LabelingSummary), LabelingError> {
    if num_classes == 0 {
        return Err(ConfigError::ZeroClasses.into());
    }
    if num_classes > u8::MAX as usize {
        return Err(ConfigError::TooManyClasses(num_classes).into());
    }
    if tolerance < 0.0 {
        return Err(ConfigError::NegativeTolerance(tolerance).into());
    }
    if raster.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            raster.cols(),
            raster.rows(),
            mask.cols(),
            mask.rows(),
        )
        .into());
    }

    let width = raster.width();

    // collect fire pixel indices and their raster values
    let mut fire_indices = Vec::new();
    let mut fire_values = Vec::new();
    for (idx, (&m, &v)) in mask.as_slice().iter().zip(raster.as_slice()).enumerate() {
        if m == MASK_FOREGROUND {
            fire_indices.push(idx);
            fire_values.push(v as f64);
        }
    }

    // background pixels are 0 in the freshly allocated output
    let mut labels = Image::from_size_val(raster.size(), 0u8)?;

    if fire_indices.is_empty() {
        return Ok((
            labels,
            LabelingSummary {
                boundaries: Vec::new(),
                fire_pixels: 0,
                anomalies: 0,
            },
        ));
    }

    let boundaries = divide_range(&fire_values, num_classes);

    let mut anomalies = 0usize;
    let out = labels.as_slice_mut();
    for (&idx, &value) in fire_indices.iter().zip(fire_values.iter()) {
        let class = match assign_class(value, &boundaries, tolerance) {
            Some(class) => class,
            None => {
                let class = nearest_class(value, &boundaries);
                log::warn!(
                    "fire value {} at ({}, {}) outside all boundary intervals, assigned class {}",
                    value,
                    idx / width,
                    idx % width,
                    class
                );
                anomalies += 1;
                class
            }
        };
        out[idx] = class as u8;
    }

    Ok((
        labels,
        LabelingSummary {
            boundaries,
            fire_pixels: fire_indices.len(),
            anomalies,
        },
    ))
}

/// Check the post-conditions of a label map.
///
/// Every value must be at most `num_classes` and the background class
/// 0 must be present.
pub fn verify_labels(labels: &Image<u8, 1>, num_classes: usize) -> bool {
    let data = labels.as_slice();
    let max = data.iter().max().copied().unwrap_or(0);
    let min = data.iter().min().copied().unwrap_or(0);
    max as usize <= num_classes && min == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use firemask_image::ImageSize;

    #[test]
    fn divide_range_reference_fixture() {
        let values = [10.0, 10.0, 20.0, 20.0, 30.0, 30.0];
        let boundaries = divide_range(&values, 3);

        assert_eq!(boundaries.len(), 4);
        assert_eq!(boundaries[0], 10.0);
        assert!((boundaries[1] - (10.0 + 20.0 / 3.0)).abs() < 1e-9);
        assert!((boundaries[2] - (10.0 + 40.0 / 3.0)).abs() < 1e-9);
        assert_eq!(boundaries[3], 30.0);

        // monotonically non-decreasing
        for w in boundaries.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn divide_range_constant_values_collapse() {
        let boundaries = divide_range(&[5.0, 5.0, 5.0], 4);
        assert_eq!(boundaries, vec![5.0; 5]);
    }

    #[test]
    fn divide_range_empty_values() {
        assert!(divide_range(&[], 3).is_empty());
    }

    #[test]
    fn assign_class_tolerance_rules() {
        let boundaries = [10.0, 20.0, 30.0];

        // lower bound relaxed by tolerance on every interval
        assert_eq!(assign_class(9.8, &boundaries, 0.3), Some(1));
        // upper bound of a non-last interval is exclusive
        assert_eq!(assign_class(20.0, &boundaries, 0.3), Some(2));
        // last interval closed above with tolerance
        assert_eq!(assign_class(30.2, &boundaries, 0.3), Some(2));
        // outside even with tolerance
        assert_eq!(assign_class(31.0, &boundaries, 0.3), None);
        assert_eq!(assign_class(9.0, &boundaries, 0.3), None);
    }

    #[test]
    fn assign_class_first_match_wins() {
        // a value on a shared breakpoint belongs to the next interval
        // (exclusive upper bound), never to two classes at once
        let boundaries = [0.0, 10.0, 20.0];
        assert_eq!(assign_class(10.0, &boundaries, 0.5), Some(2));
        // but within the lower tolerance of interval 1 it is taken by
        // interval 1 first
        assert_eq!(assign_class(9.8, &boundaries, 0.5), Some(1));
    }

    #[test]
    fn nearest_class_fallback() {
        let boundaries = [10.0, 20.0, 30.0];
        assert_eq!(nearest_class(5.0, &boundaries), 1);
        assert_eq!(nearest_class(99.0, &boundaries), 2);
    }

    #[test]
    fn label_reference_fixture() -> Result<(), LabelingError> {
        let size = ImageSize {
            width: 2,
            height: 4,
        };
        let raster = Image::<f32, 1>::new(
            size,
            vec![10.0, 10.0, 20.0, 20.0, 30.0, 30.0, 99.0, 99.0],
        )?;
        let mask = Image::<u8, 1>::new(size, vec![255, 255, 255, 255, 255, 255, 0, 0])?;

        let (labels, summary) = label_fire_regions(&raster, &mask, 3, DEFAULT_LABEL_TOLERANCE)?;

        assert_eq!(labels.as_slice(), [1, 1, 2, 2, 3, 3, 0, 0]);
        assert_eq!(summary.fire_pixels, 6);
        assert_eq!(summary.anomalies, 0);
        assert_eq!(summary.boundaries[0], 10.0);
        assert_eq!(summary.boundaries[3], 30.0);
        assert!(verify_labels(&labels, 3));

        Ok(())
    }

    #[test]
    fn label_no_fire_pixels_is_all_zero() -> Result<(), LabelingError> {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        let raster = Image::<f32, 1>::from_size_val(size, 42.0)?;
        let mask = Image::<u8, 1>::from_size_val(size, 0)?;

        let (labels, summary) = label_fire_regions(&raster, &mask, 5, DEFAULT_LABEL_TOLERANCE)?;

        assert!(labels.as_slice().iter().all(|&v| v == 0));
        assert!(summary.boundaries.is_empty());
        assert_eq!(summary.fire_pixels, 0);
        assert!(verify_labels(&labels, 5));

        Ok(())
    }

    #[test]
    fn label_constant_fire_values() -> Result<(), LabelingError> {
        // all fire pixels share one value: boundaries collapse, the
        // last-interval rule still labels every pixel
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let raster = Image::<f32, 1>::from_size_val(size, 77.0)?;
        let mask = Image::<u8, 1>::new(size, vec![255, 255, 255, 0])?;

        let (labels, summary) = label_fire_regions(&raster, &mask, 3, DEFAULT_LABEL_TOLERANCE)?;

        assert_eq!(labels.as_slice(), [3, 3, 3, 0]);
        assert_eq!(summary.anomalies, 0);
        assert!(verify_labels(&labels, 3));

        Ok(())
    }

    #[test]
    fn label_rejects_bad_config() -> Result<(), LabelingError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let raster = Image::<f32, 1>::from_size_val(size, 1.0)?;
        let mask = Image::<u8, 1>::from_size_val(size, 255)?;

        assert!(matches!(
            label_fire_regions(&raster, &mask, 0, 0.3),
            Err(LabelingError::Config(ConfigError::ZeroClasses))
        ));
        assert!(matches!(
            label_fire_regions(&raster, &mask, 300, 0.3),
            Err(LabelingError::Config(ConfigError::TooManyClasses(300)))
        ));
        assert!(matches!(
            label_fire_regions(&raster, &mask, 3, -0.1),
            Err(LabelingError::Config(ConfigError::NegativeTolerance(_)))
        ));

        Ok(())
    }

    #[test]
    fn label_rejects_size_mismatch() -> Result<(), LabelingError> {
        let raster = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            1.0,
        )?;
        let mask = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            255,
        )?;

        assert!(matches!(
            label_fire_regions(&raster, &mask, 3, 0.3),
            Err(LabelingError::Image(ImageError::InvalidImageSize(..)))
        ));

        Ok(())
    }

    #[test]
    fn verify_detects_out_of_range_labels() -> Result<(), LabelingError> {
        let labels = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0, 1, 2, 7],
        )?;
        assert!(!verify_labels(&labels, 3));
        assert!(verify_labels(&labels, 7));

        // no background present
        let labels = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1, 2],
        )?;
        assert!(!verify_labels(&labels, 3));

        Ok(())
    }
}
