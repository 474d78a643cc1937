//! Error types for log analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the analysis core and the output writers.
///
/// Every variant aborts the run before anything is written.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("log file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("processing error: {0}")]
    Processing(String),

    #[error("unsupported output format: {0}. Valid options: json, csv, llm_text")]
    UnsupportedFormat(String),
}

impl AnalysisError {
    /// Map an I/O error for `path`, keeping "not found" distinct.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            AnalysisError::FileNotFound(path)
        } else {
            AnalysisError::Processing(format!("{}: {err}", path.display()))
        }
    }
}

/// Convenience alias for analysis results.
pub type Result<T> = std::result::Result<T, AnalysisError>;
