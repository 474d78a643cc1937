//! Single-pass error detection over a log file.

use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::classify::is_error_line;
use crate::error::{AnalysisError, Result};
use crate::extract::extract_record;
use crate::record::{AnalysisResult, LogLine};

/// Default number of context lines on each side of an error
pub const DEFAULT_CONTEXT_WINDOW: usize = 3;

/// Decode raw log bytes as UTF-8, dropping a leading BOM.
///
/// The flag is set when malformed sequences were replaced with U+FFFD.
pub fn decode_log_bytes(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    encoding_rs::UTF_8.decode_with_bom_removal(bytes)
}

/// Read a file into numbered lines.
///
/// Trailing `\n` / `\r\n` are stripped. Malformed UTF-8 is replaced with
/// U+FFFD instead of failing the read.
pub fn read_log_lines(path: &Path) -> Result<Vec<LogLine>> {
    let bytes = std::fs::read(path).map_err(|e| AnalysisError::from_io(path, e))?;

    let (text, had_errors) = decode_log_bytes(&bytes);
    if had_errors {
        warn!(path = %path.display(), "log file contains invalid UTF-8, replaced malformed bytes");
    }

    Ok(text
        .lines()
        .enumerate()
        .map(|(i, line)| LogLine::new(i + 1, line))
        .collect())
}

/// Scans log lines for errors and collects their context.
#[derive(Debug, Clone, Copy)]
pub struct LogAnalyzer {
    window: usize,
}

impl Default for LogAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

impl LogAnalyzer {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Analyze lines already in memory.
    pub fn analyze_lines(&self, lines: &[LogLine], source: &str) -> AnalysisResult {
        let errors = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_error_line(&line.content))
            .map(|(index, _)| extract_record(lines, index, self.window))
            .collect::<Vec<_>>();

        debug!(source, lines = lines.len(), errors = errors.len(), "scan finished");
        AnalysisResult::new(source, errors)
    }

    /// Read and analyze a log file. Nothing is returned on failure.
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisResult> {
        let lines = read_log_lines(path)?;
        info!(path = %path.display(), lines = lines.len(), "analyzing log file");
        Ok(self.analyze_lines(&lines, &path.display().to_string()))
    }
}

/// Per-level line counts for the plain text report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelSummary {
    pub total_lines: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub other: usize,
}

/// Count lines by the first level keyword they contain.
///
/// This is a loose keyword count ("error" anywhere in the line), unlike
/// [`is_error_line`], so the two numbers can differ.
pub fn summarize_levels(lines: &[LogLine]) -> LevelSummary {
    let mut summary = LevelSummary {
        total_lines: lines.len(),
        ..Default::default()
    };

    for line in lines {
        let lower = line.content.to_lowercase();
        if lower.contains("error") {
            summary.errors += 1;
        } else if lower.contains("warning") {
            summary.warnings += 1;
        } else if lower.contains("info") {
            summary.info += 1;
        } else {
            summary.other += 1;
        }
    }

    summary
}
