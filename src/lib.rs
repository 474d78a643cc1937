//! logsift - find error lines in log files and explain them with an LLM
//!
//! This library provides the core of the `logsift` CLI: line
//! classification, context extraction, result formatting, and the
//! mock/live LLM responders.

pub mod analyzer;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod logs;
pub mod output;
pub mod providers;
pub mod record;

// Re-export commonly used types
pub use analyzer::{read_log_lines, summarize_levels, LevelSummary, LogAnalyzer};
pub use classify::is_error_line;
pub use cli::Cli;
pub use config::Config;
pub use error::AnalysisError;
pub use extract::{extract_record, extract_timestamp};
pub use format::{render, render_outputs, write_outputs, OutputFormat};
pub use providers::{select_responder, Responder, ResponderKind};
pub use record::{AnalysisResult, ErrorRecord, LogLine};
