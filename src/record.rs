//! Data model produced by a single analysis pass.
//!
//! Everything here is built once while scanning a file and never mutated
//! afterwards.

use serde::{Deserialize, Serialize};

/// One physical line of a log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// 1-based position in the file
    pub line_number: usize,
    pub content: String,
}

impl LogLine {
    pub fn new(line_number: usize, content: impl Into<String>) -> Self {
        Self {
            line_number,
            content: content.into(),
        }
    }

    /// Render as `[<line_number>] <content>`
    pub fn tagged(&self) -> String {
        format!("[{}] {}", self.line_number, self.content)
    }
}

/// A detected error line with its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error_line: String,
    pub line_number: usize,
    /// Lines preceding the error, in file order
    pub context_before: Vec<LogLine>,
    /// Lines following the error, in file order
    pub context_after: Vec<LogLine>,
    /// First timestamp found in the error line
    pub timestamp: Option<String>,
}

/// Result of analyzing one log source.
///
/// `total_errors_found` always equals `errors.len()`: it is computed on
/// construction and checked again when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAnalysisResult")]
pub struct AnalysisResult {
    total_errors_found: usize,
    source_identifier: String,
    errors: Vec<ErrorRecord>,
}

impl AnalysisResult {
    pub fn new(source_identifier: impl Into<String>, errors: Vec<ErrorRecord>) -> Self {
        Self {
            total_errors_found: errors.len(),
            source_identifier: source_identifier.into(),
            errors,
        }
    }

    pub fn total_errors_found(&self) -> usize {
        self.total_errors_found
    }

    pub fn source_identifier(&self) -> &str {
        &self.source_identifier
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Deserialize)]
struct RawAnalysisResult {
    total_errors_found: usize,
    source_identifier: String,
    errors: Vec<ErrorRecord>,
}

impl TryFrom<RawAnalysisResult> for AnalysisResult {
    type Error = String;

    fn try_from(raw: RawAnalysisResult) -> Result<Self, Self::Error> {
        if raw.total_errors_found != raw.errors.len() {
            return Err(format!(
                "total_errors_found is {} but {} errors are listed",
                raw.total_errors_found,
                raw.errors.len()
            ));
        }
        Ok(Self::new(raw.source_identifier, raw.errors))
    }
}
