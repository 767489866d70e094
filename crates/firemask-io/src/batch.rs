use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use firemask_image::Image;
use firemask_imgproc::color::gray_from_rgb;
use firemask_imgproc::error::ConfigError;
use firemask_imgproc::labeling::{label_fire_regions, verify_labels, LabelingError};
use firemask_imgproc::threshold::ThresholdMethod;

use crate::error::IoError;
use crate::functional::{
    has_raster_extension, mask_output_path, read_image_any_rgb8, read_image_tiff_mono8,
    read_image_tiff_monof32, write_image_tiff_gray8,
};
use crate::report::{ThresholdReport, REPORT_FILE_NAME};

/// Log a progress line on the first file and then every `PROGRESS_EVERY`.
const PROGRESS_EVERY: usize = 50;

/// Outcome of a batch conversion run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Number of images successfully converted.
    pub processed: usize,
    /// Number of images skipped after a per-file failure.
    pub skipped: usize,
    /// Per-image optimal thresholds (Otsu runs only).
    pub report: ThresholdReport,
}

/// Outcome of a batch labeling run.
#[derive(Debug, Default)]
pub struct LabelOutcome {
    /// Number of images successfully labeled.
    pub processed: usize,
    /// Number of images skipped after a per-file failure.
    pub skipped: usize,
    /// Total fire values force-assigned to their nearest class.
    pub anomalies: usize,
}

/// Read a raster file as a single-channel f32 image.
///
/// TIFF files keep their native sample values (the thermal path);
/// everything else is decoded as RGB and reduced to luminance.
pub fn read_raster_monof32(file_path: impl AsRef<Path>) -> Result<Image<f32, 1>, IoError> {
    let file_path = file_path.as_ref();

    let is_tiff = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "tiff" || ext == "tif"
        })
        .unwrap_or(false);

    if is_tiff {
        return read_image_tiff_monof32(file_path);
    }

    let rgb = read_image_any_rgb8(file_path)?.cast::<f32>()?;
    let mut gray = Image::from_size_val(rgb.size(), 0.0)?;
    gray_from_rgb(&rgb, &mut gray)?;
    Ok(gray)
}

fn list_raster_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !dir.exists() {
        return Err(IoError::FileDoesNotExist(dir.to_path_buf()));
    }

    let mut files = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_raster_extension(path))
        .collect::<Vec<_>>();
    files.sort();

    Ok(files)
}

/// Convert a single raster into a binary fire mask.
///
/// The mask name records the threshold: `<stem>_<t>.tiff` for Otsu
/// (the computed value) and binary (the requested value, formatted
/// verbatim), `<stem>.tiff` for hysteresis. Returns the Otsu
/// threshold when one was computed.
pub fn convert_image(
    file_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    method: ThresholdMethod,
) -> Result<Option<u8>, IoError> {
    let file_path = file_path.as_ref();

    let raster = read_raster_monof32(file_path)?;
    let mut mask = Image::from_size_val(raster.size(), 0u8)?;

    let threshold = method.apply(&raster, &mut mask)?;

    let suffix = match (method, threshold) {
        (_, Some(t)) => Some(t.to_string()),
        (ThresholdMethod::Binary { threshold }, None) => Some(threshold.to_string()),
        _ => None,
    };

    let path = mask_output_path(output_dir.as_ref(), file_path, suffix.as_deref());
    write_image_tiff_gray8(path, &mask)?;

    Ok(threshold)
}

// folder mode keeps masks under the input stem so label_folder can
// find them again
fn convert_file(
    file_path: &Path,
    output_dir: &Path,
    method: ThresholdMethod,
) -> Result<Option<u8>, IoError> {
    let raster = read_raster_monof32(file_path)?;
    let mut mask = Image::from_size_val(raster.size(), 0u8)?;

    let threshold = method.apply(&raster, &mut mask)?;

    write_image_tiff_gray8(mask_output_path(output_dir, file_path, None), &mask)?;

    Ok(threshold)
}

/// Convert every raster in a folder into a binary fire mask.
///
/// Each mask is written as `<stem>.tiff` under the raster's own stem,
/// the name [`label_folder`] resolves when labeling the same folder.
/// Images are processed independently in parallel; a file that fails
/// to read or convert is logged and skipped without aborting the
/// batch. Otsu runs additionally record the per-image threshold and
/// write an `optimal_thresholds.csv` report into the output folder.
pub fn convert_folder(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    method: ThresholdMethod,
) -> Result<BatchOutcome, IoError> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    let files = list_raster_files(input_dir)?;
    std::fs::create_dir_all(output_dir)?;

    log::info!("grabbing images from: {}", input_dir.display());
    log::info!("saving images to: {}", output_dir.display());

    let progress = AtomicUsize::new(0);
    let results = files
        .par_iter()
        .map(|file_path| {
            let result = convert_file(file_path, output_dir, method);
            let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
            if done == 1 || done % PROGRESS_EVERY == 0 {
                log::info!("number of images processed: {done}");
            }
            (file_path, result)
        })
        .collect::<Vec<_>>();

    let mut outcome = BatchOutcome::default();
    for (file_path, result) in results {
        match result {
            Ok(threshold) => {
                outcome.processed += 1;
                if let Some(t) = threshold {
                    let filename = file_path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or_default();
                    outcome.report.record(filename, t);
                }
            }
            Err(err) => {
                log::warn!("skipping {}: {err}", file_path.display());
                outcome.skipped += 1;
            }
        }
    }

    if !outcome.report.is_empty() {
        if let Some(mean) = outcome.report.mean() {
            log::info!("mean optimal threshold = {mean}");
        }
        outcome.report.write_csv(output_dir.join(REPORT_FILE_NAME))?;
    }

    Ok(outcome)
}

/// Label every raster in a folder against its binary mask.
///
/// For each raster `<stem>.<ext>` in `raster_dir` the mask
/// `<stem>.tiff` is read from `mask_dir`; the label map is written to
/// `output_dir` under the same stem. Per-file failures (missing mask,
/// decode error, size mismatch) are logged and skipped.
pub fn label_folder(
    raster_dir: impl AsRef<Path>,
    mask_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    num_classes: usize,
    tolerance: f64,
) -> Result<LabelOutcome, IoError> {
    let raster_dir = raster_dir.as_ref();
    let mask_dir = mask_dir.as_ref();
    let output_dir = output_dir.as_ref();

    // configuration problems abort the batch up front instead of
    // failing identically on every file
    if num_classes == 0 {
        return Err(LabelingError::from(ConfigError::ZeroClasses).into());
    }
    if num_classes > u8::MAX as usize {
        return Err(LabelingError::from(ConfigError::TooManyClasses(num_classes)).into());
    }
    if tolerance < 0.0 {
        return Err(LabelingError::from(ConfigError::NegativeTolerance(tolerance)).into());
    }

    let files = list_raster_files(raster_dir)?;
    std::fs::create_dir_all(output_dir)?;

    let results = files
        .par_iter()
        .map(|file_path| {
            let result = (|| -> Result<usize, IoError> {
                let stem = file_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();
                let raster = read_raster_monof32(file_path)?;
                let mask = read_image_tiff_mono8(mask_dir.join(format!("{stem}.tiff")))?;

                let (labels, summary) =
                    label_fire_regions(&raster, &mask, num_classes, tolerance)?;
                debug_assert!(verify_labels(&labels, num_classes));

                write_image_tiff_gray8(output_dir.join(format!("{stem}.tiff")), &labels)?;
                Ok(summary.anomalies)
            })();
            (file_path, result)
        })
        .collect::<Vec<_>>();

    let mut outcome = LabelOutcome::default();
    for (file_path, result) in results {
        match result {
            Ok(anomalies) => {
                outcome.processed += 1;
                outcome.anomalies += anomalies;
            }
            Err(err) => {
                log::warn!("skipping {}: {err}", file_path.display());
                outcome.skipped += 1;
            }
        }
    }

    Ok(outcome)
}

/// Verify every label map in a folder against the expected class range.
///
/// Returns the paths that violate the label post-conditions; each
/// violation is also logged. Files that fail to decode are logged and
/// skipped, like the other batch passes.
pub fn check_labels_folder(
    dir: impl AsRef<Path>,
    num_classes: usize,
) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    let files = list_raster_files(dir)?;

    let mut invalid = Vec::new();
    for file_path in files {
        let labels = match read_image_tiff_mono8(&file_path) {
            Ok(labels) => labels,
            Err(err) => {
                log::warn!("skipping {}: {err}", file_path.display());
                continue;
            }
        };
        if verify_labels(&labels, num_classes) {
            log::debug!("{} labeled correctly", file_path.display());
        } else {
            log::warn!("{} not labeled properly", file_path.display());
            invalid.push(file_path);
        }
    }

    Ok(invalid)
}
