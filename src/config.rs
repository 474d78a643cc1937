//! Configuration system for `logsift`.
//!
//! Values come from, in increasing priority: built-in defaults, the TOML
//! file, environment variables (including a `.env` file loaded by the
//! binary), and command-line flags.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::analyzer::DEFAULT_CONTEXT_WINDOW;
use crate::error::Result;
use crate::format::{parse_formats, OutputFormat};
use crate::providers::API_KEY_ENV_VAR;

/// Analysis settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lines of context on each side of an error
    pub context_window: usize,
    /// Output formats to write (json, csv, llm_text)
    pub formats: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            formats: OutputFormat::ALL.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Where logs are read from and results written to
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for the newest `.txt` log
    pub logs_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Explicit log file, skipping the directory scan
    pub log_file: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("logs"),
            output_dir: PathBuf::from("output"),
            log_file: None,
        }
    }
}

/// LLM settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// Send the report to the LLM at all
    pub enabled: bool,
    pub model: String,
    pub max_output_tokens: u32,
    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gemini-1.5-flash".to_string(),
            max_output_tokens: 2048,
            api_key: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub paths: PathsConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Load config from `path`, falling back to defaults when it is absent
    /// or invalid
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "invalid config file, using defaults");
                Self::default()
            }),
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read config file, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Get the config file path (~/.config/logsift/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("logsift").join("config.toml"))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup, so tests need not touch the
    /// process environment.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV_VAR) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.llm.model = model;
        }
        if let Some(path) = get("LOG_FILE_PATH") {
            self.paths.log_file = Some(PathBuf::from(path));
        }
        if let Some(dir) = get("LOGSIFT_LOGS_DIR") {
            self.paths.logs_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("LOGSIFT_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(dir);
        }
        if let Some(window) = get("LOGSIFT_CONTEXT_WINDOW") {
            match window.trim().parse() {
                Ok(n) => self.analysis.context_window = n,
                Err(_) => warn!(value = %window, "ignoring invalid LOGSIFT_CONTEXT_WINDOW"),
            }
        }
        if get("LOGSIFT_NO_LLM").is_some_and(|v| v == "1") {
            self.llm.enabled = false;
        }
    }

    /// Parse the configured format names.
    pub fn output_formats(&self) -> Result<Vec<OutputFormat>> {
        parse_formats(self.analysis.formats.as_slice())
    }

    pub fn output_dir(&self) -> &Path {
        &self.paths.output_dir
    }
}

/// Generate default config as TOML string
pub fn generate_default_config() -> String {
    r#"# logsift configuration
# Place this file at ~/.config/logsift/config.toml

[analysis]
# Lines of context captured before and after each error
context_window = 3

# Files to write: json, csv, llm_text
formats = ["json", "csv", "llm_text"]

[paths]
# Directory searched for the most recently modified .txt log
logs_dir = "logs"

# Where error_analysis.json, error_analysis.csv, llm_input.txt and
# gemini_analysis.txt are written
output_dir = "output"

# Analyze this file instead of searching logs_dir
# log_file = "logs/app.txt"

[llm]
# Send the error report to Gemini (a mock answers when no key is set)
enabled = true
model = "gemini-1.5-flash"
max_output_tokens = 2048

# Environment variable overrides:
# GEMINI_API_KEY          - API key for the live Gemini client
# GEMINI_MODEL            - Model name
# LOG_FILE_PATH           - Log file to analyze
# LOGSIFT_LOGS_DIR        - Logs directory
# LOGSIFT_OUTPUT_DIR      - Output directory
# LOGSIFT_CONTEXT_WINDOW  - Context window size
# LOGSIFT_NO_LLM=1        - Skip the LLM step
"#
    .to_string()
}

/// Print the default config to stdout
pub fn print_default_config() {
    print!("{}", generate_default_config());
}
