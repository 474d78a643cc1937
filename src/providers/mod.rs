//! LLM responders that turn the formatted error report into an analysis.
//!
//! Two implementations sit behind the [`Responder`] trait: a deterministic
//! mock, and a live Gemini client that falls back to the mock when a call
//! fails. Which one is used is decided once, in [`select_responder`].

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

use crate::config::LlmConfig;

pub use gemini::{GeminiClient, LiveResponder};
pub use mock::MockResponder;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Instruction placed ahead of the formatted errors
pub const PROMPT_HEADER: &str = "Analyze the following log data for errors and patterns. \
Identify likely root causes, group related failures, and suggest concrete next steps.";

/// Log content the mock answers with when no log file is available.
pub const DEFAULT_LOG_FIXTURE: &str = "\
2023-09-04 10:00:00 INFO User login successful
2023-09-04 10:05:00 WARNING High memory usage detected
2023-09-04 10:10:00 ERROR Database connection failed
2023-09-04 10:15:00 INFO Backup completed successfully
2023-09-04 10:20:00 ERROR Invalid user input
2023-09-04 10:25:00 WARNING Disk space low
2023-09-04 10:30:00 INFO System restart initiated";

/// Which responder implementation is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderKind {
    Mock,
    Live,
}

impl fmt::Display for ResponderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponderKind::Mock => write!(f, "mock"),
            ResponderKind::Live => write!(f, "live"),
        }
    }
}

/// Something that answers a prompt with lines of text.
///
/// Implementations absorb their own failures: an empty vector means "no
/// response", never an error.
#[async_trait]
pub trait Responder: Send + Sync {
    fn kind(&self) -> ResponderKind;

    /// Name for display
    fn name(&self) -> &'static str;

    /// Answer `prompt`. `log_path` is the log file the mock may echo back.
    async fn respond(&self, prompt: &str, log_path: Option<&Path>) -> Vec<String>;
}

/// Error types for the live client
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error from {provider}: {message}")]
    ApiError { provider: String, message: String },

    #[error("Rate limited by {provider}. Please wait and try again.")]
    RateLimited { provider: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },
}

/// Build the full prompt sent to the responder.
pub fn build_prompt(llm_text: &str) -> String {
    format!("{PROMPT_HEADER}\n\n{}", llm_text.trim_end())
}

/// Split a text response into lines, dropping surrounding whitespace.
pub fn process_response(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.lines().map(String::from).collect()
}

/// Pick the responder for this run: live when an API key is configured,
/// mock otherwise. `fixture` backs the mock in both cases.
pub fn select_responder(config: &LlmConfig, fixture: impl Into<String>) -> Box<dyn Responder> {
    let mock = MockResponder::new(fixture);

    match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            let client = GeminiClient::new(key.to_string(), config.model.clone(), config.max_output_tokens);
            Box::new(LiveResponder::new(client, mock))
        }
        None => {
            tracing::info!("no {API_KEY_ENV_VAR} configured, using mock responder");
            Box::new(mock)
        }
    }
}
