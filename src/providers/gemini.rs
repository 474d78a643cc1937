//! Google Gemini API client.
//!
//! Uses the `generateContent` REST endpoint. [`LiveResponder`] wraps the
//! client and answers from a [`MockResponder`] whenever the call fails.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use super::{process_response, MockResponder, ProviderError, Responder, ResponderKind};

/// Gemini API base URL
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER: &str = "Gemini";

/// Thin client for one model
pub struct GeminiClient {
    /// HTTP client
    client: Client,
    api_key: String,
    model: String,
    max_output_tokens: u32,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, max_output_tokens: u32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            max_output_tokens,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at another endpoint root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: self.max_output_tokens,
            }),
        }
    }

    /// Send `prompt` and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self.build_request(prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited {
                    provider: PROVIDER.to_string(),
                });
            }
            return Err(ProviderError::ApiError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, error_body),
            });
        }

        let body: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: PROVIDER.to_string(),
                    message: e.to_string(),
                })?;

        Ok(body.text())
    }
}

/// Live client with a mock fallback
pub struct LiveResponder {
    client: GeminiClient,
    fallback: MockResponder,
}

impl LiveResponder {
    pub fn new(client: GeminiClient, fallback: MockResponder) -> Self {
        Self { client, fallback }
    }
}

#[async_trait]
impl Responder for LiveResponder {
    fn kind(&self) -> ResponderKind {
        ResponderKind::Live
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn respond(&self, prompt: &str, log_path: Option<&Path>) -> Vec<String> {
        match self.client.generate(prompt).await {
            Ok(text) => {
                debug!(model = self.client.model(), chars = text.len(), "Gemini responded");
                process_response(&text)
            }
            Err(err) => {
                warn!(%err, "Gemini call failed, falling back to mock response");
                self.fallback.respond(prompt, log_path).await
            }
        }
    }
}

// API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}
