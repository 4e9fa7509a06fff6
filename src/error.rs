use thiserror::Error;

pub type Result<T> = std::result::Result<T, InsightError>;

/// Failures of the file-facing surface. The analysis itself never fails; it
/// reports missing data as absent fields instead.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
