use std::path::Path;

use crate::error::IoError;

/// File name of the batch threshold report.
pub const REPORT_FILE_NAME: &str = "optimal_thresholds.csv";

/// Per-image optimal thresholds collected over a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdReport {
    rows: Vec<(String, u8)>,
}

impl ThresholdReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the optimal threshold found for one image.
    pub fn record(&mut self, filename: impl Into<String>, threshold: u8) {
        self.rows.push((filename.into(), threshold));
    }

    /// The recorded `(filename, threshold)` rows.
    pub fn rows(&self) -> &[(String, u8)] {
        &self.rows
    }

    /// Whether no thresholds have been recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean of the recorded thresholds, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        let sum: f64 = self.rows.iter().map(|(_, t)| *t as f64).sum();
        Some(sum / self.rows.len() as f64)
    }

    /// Write the report as CSV with a `Filename, Optimal Threshold`
    /// header, one row per processed image.
    pub fn write_csv(&self, file_path: impl AsRef<Path>) -> Result<(), IoError> {
        let mut writer = csv::Writer::from_path(file_path.as_ref())?;
        writer.write_record(["Filename", "Optimal Threshold"])?;
        for (filename, threshold) in &self.rows {
            writer.write_record([filename.as_str(), &threshold.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_recorded_thresholds() {
        let mut report = ThresholdReport::new();
        assert_eq!(report.mean(), None);

        report.record("a.tiff", 80);
        report.record("b.tiff", 100);
        assert_eq!(report.mean(), Some(90.0));
        assert_eq!(report.rows().len(), 2);
    }

    #[test]
    fn csv_layout() -> Result<(), IoError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(REPORT_FILE_NAME);

        let mut report = ThresholdReport::new();
        report.record("frame_001.tiff", 87);
        report.record("frame_002.tiff", 92);
        report.write_csv(&path)?;

        let contents = std::fs::read_to_string(&path)?;
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("Filename,Optimal Threshold"));
        assert_eq!(lines.next(), Some("frame_001.tiff,87"));
        assert_eq!(lines.next(), Some("frame_002.tiff,92"));

        Ok(())
    }
}
