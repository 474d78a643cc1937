//! Command-line interface definitions for `logsift`.

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::format::OutputFormat;

/// Find error lines in a log file and explain them with an LLM
#[derive(Parser, Debug)]
#[command(
    name = "logsift",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LOGSIFT_GIT_SHA"), ")"),
    about,
    long_about = None
)]
#[command(
    after_help = "EXAMPLES:\n    logsift\n    logsift logs/app.txt --window 5\n    logsift --logs-dir /var/log/myapp -f json -f csv --no-llm"
)]
pub struct Cli {
    /// Log file to analyze (default: newest .txt in the logs directory)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Directory searched for the newest .txt log
    #[arg(long, value_name = "DIR")]
    pub logs_dir: Option<PathBuf>,

    /// Directory the analysis files are written to
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Lines of context captured before and after each error
    #[arg(long, short = 'w', value_name = "N")]
    pub window: Option<usize>,

    /// Output formats to write (repeatable; default: all)
    #[arg(long, short = 'f', value_enum, value_name = "FORMAT")]
    pub format: Vec<OutputFormat>,

    /// Skip the LLM analysis step
    #[arg(long)]
    pub no_llm: bool,

    /// Don't ask to confirm the selected log file
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print the analysis as JSON instead of the colored summary
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Also write a per-level line count report (report.txt)
    #[arg(long)]
    pub report: bool,

    /// Only print errors and the paths of written files
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Log progress to stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Show debug info (prompt and raw LLM response)
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Read configuration from this file instead of ~/.config/logsift/config.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output default configuration to stdout
    #[arg(long)]
    pub print_config: bool,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Tracing filter implied by the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "logsift=debug"
        } else if self.verbose {
            "logsift=info"
        } else {
            "logsift=warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["logsift"]);
        assert!(cli.file.is_none());
        assert!(cli.format.is_empty());
        assert!(cli.window.is_none());
        assert!(!cli.no_llm);
        assert!(!cli.json);
        assert_eq!(cli.log_filter(), "logsift=warn");
    }

    #[test]
    fn test_cli_parses_file() {
        let cli = Cli::parse_from(["logsift", "logs/app.txt"]);
        assert_eq!(cli.file, Some(PathBuf::from("logs/app.txt")));
    }

    #[test]
    fn test_cli_parses_window() {
        let cli = Cli::parse_from(["logsift", "-w", "5"]);
        assert_eq!(cli.window, Some(5));
        assert!(Cli::try_parse_from(["logsift", "--window", "-1"]).is_err());
    }

    #[test]
    fn test_cli_parses_formats() {
        let cli = Cli::parse_from(["logsift", "-f", "json", "--format", "llm-text"]);
        assert_eq!(cli.format, vec![OutputFormat::Json, OutputFormat::LlmText]);
    }

    #[test]
    fn test_cli_accepts_snake_case_format() {
        let cli = Cli::parse_from(["logsift", "-f", "llm_text"]);
        assert_eq!(cli.format, vec![OutputFormat::LlmText]);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["logsift", "-f", "xml"]).is_err());
    }

    #[test]
    fn test_cli_parses_dirs() {
        let cli = Cli::parse_from(["logsift", "--logs-dir", "/var/log", "-o", "/tmp/out"]);
        assert_eq!(cli.logs_dir, Some(PathBuf::from("/var/log")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["logsift", "--no-llm", "-y", "-j", "--report", "-q"]);
        assert!(cli.no_llm);
        assert!(cli.yes);
        assert!(cli.json);
        assert!(cli.report);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_log_filter() {
        assert_eq!(Cli::parse_from(["logsift", "-v"]).log_filter(), "logsift=info");
        assert_eq!(Cli::parse_from(["logsift", "-v", "-d"]).log_filter(), "logsift=debug");
    }

    #[test]
    fn test_cli_parses_completions() {
        let cli = Cli::parse_from(["logsift", "--completions", "bash"]);
        assert_eq!(cli.completions, Some(Shell::Bash));
    }
}
