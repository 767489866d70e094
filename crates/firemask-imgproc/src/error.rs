/// Errors produced by invalid pipeline configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    /// The number of label classes must be at least one.
    #[error("num_classes must be >= 1")]
    ZeroClasses,

    /// Labels are stored as 8-bit values.
    #[error("num_classes must be <= 255, got {0}")]
    TooManyClasses(usize),

    /// The label tolerance must be non-negative.
    #[error("label tolerance must be >= 0, got {0}")]
    NegativeTolerance(f64),

    /// The thresholding mode string is not recognized.
    #[error("unknown threshold mode: {0:?} (expected BINARY, HYST or OTSU)")]
    UnknownMode(String),
}
