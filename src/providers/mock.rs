//! Deterministic stand-in for the live API.

use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};

use super::{process_response, Responder, ResponderKind};
use crate::analyzer::decode_log_bytes;

/// Answers every prompt with log content: the given log file when it can
/// be read, otherwise the fixture injected at construction.
#[derive(Debug, Clone)]
pub struct MockResponder {
    fixture: String,
}

impl MockResponder {
    pub fn new(fixture: impl Into<String>) -> Self {
        Self {
            fixture: fixture.into(),
        }
    }

    fn load(&self, log_path: Option<&Path>) -> String {
        let Some(path) = log_path else {
            return self.fixture.clone();
        };

        match std::fs::read(path) {
            Ok(bytes) => decode_log_bytes(&bytes).0.into_owned(),
            Err(err) => {
                warn!(path = %path.display(), %err, "mock could not read log file, using fixture");
                self.fixture.clone()
            }
        }
    }
}

#[async_trait]
impl Responder for MockResponder {
    fn kind(&self) -> ResponderKind {
        ResponderKind::Mock
    }

    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn respond(&self, prompt: &str, log_path: Option<&Path>) -> Vec<String> {
        info!(prompt_chars = prompt.len(), "simulating LLM call");
        process_response(&self.load(log_path))
    }
}
