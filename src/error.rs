use std::io;
use thiserror::Error;

/// Error type for analysis and its collaborators.
///
/// Malformed CSV content is never an error: it is reported as an
/// [`Issue`](crate::Issue) on the result instead.
#[derive(Error, Debug)]
pub enum LintError {
    /// The caller cancelled the analysis before it completed.
    #[error("Analysis cancelled")]
    Cancelled,

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error during issue export.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, LintError>;
