//! Rendering an [`AnalysisResult`] as JSON, CSV or LLM prompt text, and
//! writing the rendered files.

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyzer::LevelSummary;
use crate::error::{AnalysisError, Result};
use crate::record::{AnalysisResult, LogLine};

/// Divider between error blocks in the LLM text
pub const DIVIDER: &str = "--------------------------------------------------";

const CSV_HEADER: &str = "line_number,error_line,timestamp,context_before,context_after";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum OutputFormat {
    /// Full analysis as pretty-printed JSON
    Json,
    /// One row per error
    Csv,
    /// Plain text narrative for the LLM prompt
    #[value(alias = "llm_text")]
    LlmText,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Csv, OutputFormat::LlmText];

    /// File name written in the output directory
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Json => "error_analysis.json",
            OutputFormat::Csv => "error_analysis.csv",
            OutputFormat::LlmText => "llm_input.txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::LlmText => write!(f, "llm_text"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "llm_text" | "llm-text" | "text" => Ok(OutputFormat::LlmText),
            _ => Err(AnalysisError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Parse a list of format names, failing on the first unknown one.
pub fn parse_formats<S: AsRef<str>>(names: &[S]) -> Result<Vec<OutputFormat>> {
    let mut formats = Vec::new();
    for name in names {
        let format = name.as_ref().parse::<OutputFormat>()?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    Ok(formats)
}

/// Render `result` in the given format.
pub fn render(result: &AnalysisResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Csv => Ok(to_csv(result)),
        OutputFormat::LlmText => Ok(to_llm_text(result)),
    }
}

/// Pretty JSON in struct field order. serde_json keeps non-ASCII as is.
pub fn to_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| AnalysisError::Processing(e.to_string()))
}

fn join_context(lines: &[LogLine]) -> String {
    lines
        .iter()
        .map(LogLine::tagged)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Quote a CSV field when it holds a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn to_csv(result: &AnalysisResult) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for record in result.errors() {
        let row = [
            record.line_number.to_string(),
            csv_field(&record.error_line),
            csv_field(record.timestamp.as_deref().unwrap_or("")),
            csv_field(&join_context(&record.context_before)),
            csv_field(&join_context(&record.context_after)),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

pub fn to_llm_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str("Log Error Analysis\n");
    out.push_str(&format!("Total errors found: {}\n", result.total_errors_found()));
    out.push_str(&format!("Source: {}\n", result.source_identifier()));
    out.push_str(DIVIDER);
    out.push('\n');

    for (n, record) in result.errors().iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("Error #{} (Line {})\n", n + 1, record.line_number));
        out.push_str(&format!("Error: {}\n", record.error_line));
        if let Some(ts) = &record.timestamp {
            out.push_str(&format!("Timestamp: {ts}\n"));
        }

        out.push_str("\nContext Before:\n");
        for line in &record.context_before {
            out.push_str(&format!("  {}\n", line.tagged()));
        }

        out.push_str("\nContext After:\n");
        for line in &record.context_after {
            out.push_str(&format!("  {}\n", line.tagged()));
        }

        out.push('\n');
        out.push_str(DIVIDER);
        out.push('\n');
    }

    out
}

/// Render each format into its target path under `output_dir`.
///
/// Nothing touches the disk, so a rendering failure leaves no files behind.
pub fn render_outputs(
    result: &AnalysisResult,
    formats: &[OutputFormat],
    output_dir: &Path,
) -> Result<Vec<(PathBuf, String)>> {
    formats
        .iter()
        .map(|&format| Ok((output_dir.join(format.file_name()), render(result, format)?)))
        .collect()
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn discard(paths: &[PathBuf]) {
    for path in paths {
        let _ = std::fs::remove_file(path);
    }
}

/// Write all `files` or none of them.
///
/// Each file is written to a hidden temp file beside its target, and the
/// temp files are renamed into place only once every write succeeded. On
/// failure the temp files and any targets already renamed are removed.
pub fn write_outputs(files: &[(PathBuf, String)]) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let temp = staging_path(path);
        if let Err(err) = write_file(&temp, contents) {
            discard(&staged);
            let _ = std::fs::remove_file(&temp);
            return Err(err);
        }
        staged.push(temp);
    }

    let mut committed: Vec<PathBuf> = Vec::with_capacity(files.len());
    for ((path, _), temp) in files.iter().zip(&staged) {
        if let Err(err) = std::fs::rename(temp, path) {
            discard(&committed);
            discard(&staged[committed.len()..]);
            return Err(AnalysisError::Processing(format!("{}: {err}", path.display())));
        }
        committed.push(path.clone());
    }

    for path in &committed {
        info!(path = %path.display(), "wrote analysis output");
    }
    Ok(committed)
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AnalysisError::from_io(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| AnalysisError::from_io(path, e))
}

/// Plain text level report.
pub fn format_level_report(summary: &LevelSummary) -> String {
    let title = "Log Analysis Report";
    let mut report = format!("{title}\n{}\n", "=".repeat(title.len()));
    report.push_str(&format!("Total Lines: {}\n", summary.total_lines));
    report.push_str(&format!("Errors: {}\n", summary.errors));
    report.push_str(&format!("Warnings: {}\n", summary.warnings));
    report.push_str(&format!("Info: {}\n", summary.info));
    report.push_str(&format!("Other: {}\n", summary.other));
    report
}
