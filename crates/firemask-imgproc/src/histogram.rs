use firemask_image::Image;

/// Number of fixed-width intensity bins over the value domain [0, 256).
pub const NUM_BINS: usize = 256;

/// Policy used to map continuous raster values onto the bin domain.
///
/// The two policies are deliberately separate rather than silently
/// merged: general imagery is rounded to the nearest integer, while
/// thermal rasters carry integral degree values that must be used
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantization {
    /// Round to the nearest integer in [0, 255].
    #[default]
    Rounded,
    /// Truncate-cast to [0, 255] without rounding (thermal rasters).
    Thermal,
}

impl Quantization {
    /// Map a raster value onto its bin index.
    pub fn bin_index(&self, value: f32) -> usize {
        let v = match self {
            Quantization::Rounded => value.round(),
            Quantization::Thermal => value.trunc(),
        };
        v.clamp(0.0, (NUM_BINS - 1) as f32) as usize
    }
}

/// Fixed-bin intensity histogram and its derived cumulative statistics.
///
/// `cumulative_sum[k]` is the fraction of pixels with bin index `<= k`;
/// `cumulative_mean[k]` is the intensity-weighted cumulative mean
/// `sum(probabilities[i] * i)` for `i <= k`.
pub struct HistogramStats {
    /// Per-bin pixel counts.
    pub counts: [u32; NUM_BINS],
    /// Per-bin probabilities; sums to 1 for a non-empty raster.
    pub probabilities: [f64; NUM_BINS],
    /// Cumulative probability per bin.
    pub cumulative_sum: [f64; NUM_BINS],
    /// Cumulative intensity-weighted mean per bin.
    pub cumulative_mean: [f64; NUM_BINS],
}

impl HistogramStats {
    /// Compute the histogram statistics of a single-channel raster.
    ///
    /// # Arguments
    ///
    /// * `src` - The input raster.
    /// * `quantization` - The policy mapping values onto bins.
    ///
    /// # Examples
    ///
    /// ```
    /// use firemask_image::{Image, ImageSize};
    /// use firemask_imgproc::histogram::{HistogramStats, Quantization};
    ///
    /// let image = Image::<f32, 1>::new(
    ///     ImageSize { width: 2, height: 2 },
    ///     vec![0.0, 10.0, 10.0, 255.0],
    /// ).unwrap();
    ///
    /// let stats = HistogramStats::compute(&image, Quantization::Thermal);
    /// assert_eq!(stats.counts[10], 2);
    /// assert!((stats.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-6);
    /// ```
    pub fn compute(src: &Image<f32, 1>, quantization: Quantization) -> Self {
        let mut counts = [0u32; NUM_BINS];
        for &pixel in src.as_slice() {
            counts[quantization.bin_index(pixel)] += 1;
        }

        let total = src.as_slice().len() as f64;

        let mut probabilities = [0f64; NUM_BINS];
        let mut cumulative_sum = [0f64; NUM_BINS];
        let mut cumulative_mean = [0f64; NUM_BINS];

        let mut sum_acc = 0.0;
        let mut mean_acc = 0.0;
        for i in 0..NUM_BINS {
            let p = counts[i] as f64 / total;
            probabilities[i] = p;
            sum_acc += p;
            mean_acc += p * i as f64;
            cumulative_sum[i] = sum_acc;
            cumulative_mean[i] = mean_acc;
        }

        Self {
            counts,
            probabilities,
            cumulative_sum,
            cumulative_mean,
        }
    }
}
