//! OpenAI-compatible chat-completion client.
//!
//! Sends `POST {base_url}/chat/completions` with a system+user message pair
//! and returns the first choice's content. Works against any endpoint that
//! speaks the OpenAI wire format; `base_url` selects the provider.
//!
//! One request per generation — failures surface to the caller, there is no
//! retry or failover layer here.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use mcpgen_core::{
    application::{
        ApplicationError,
        ports::{CompletionClient, CompletionRequest},
    },
    error::{McpgenError, McpgenResult},
};

/// Default base URL for OpenAI-compatible providers.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when neither flag, file, nor environment names one.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

// ── Configuration ─────────────────────────────────────────────────────────────

/// Completion-endpoint configuration.
///
/// Passed explicitly to [`OpenAiClient::new`] — the client holds no ambient
/// state, so two clients with different configs can coexist in one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    /// `None` means the standard OpenAI endpoint.
    pub base_url: Option<String>,
}

impl LlmConfig {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url,
        }
    }

    /// Full URL of the chat-completions endpoint.
    fn endpoint(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

/// OpenAI-compatible chat completion request (subset we need).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Production [`CompletionClient`] backed by `reqwest`.
#[derive(Debug)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiClient {
    /// Build a client from an explicit configuration.
    ///
    /// Refuses an empty API key up front — this is the precondition check
    /// that guarantees no network call is ever attempted without credentials.
    pub fn new(config: LlmConfig) -> McpgenResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ApplicationError::MissingApiKey.into());
        }

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| McpgenError::Internal {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, config })
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn complete(&self, request: &CompletionRequest) -> McpgenResult<String> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
        };

        let url = self.config.endpoint();
        debug!(%url, "Sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| completion_failed(format!("request error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(completion_failed(format!(
                "endpoint returned {status}: {}",
                truncate(&detail, 300)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| completion_failed(format!("malformed response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| completion_failed("response contained no choices".into()))
    }
}

fn completion_failed(reason: String) -> McpgenError {
    ApplicationError::CompletionFailed { reason }.into()
}

/// Keep provider error bodies readable in terminal output.
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_defaults_to_openai() {
        let cfg = LlmConfig::new("k", DEFAULT_MODEL, None);
        assert_eq!(cfg.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn endpoint_honors_custom_base_url_with_trailing_slash() {
        let cfg = LlmConfig::new("k", "m", Some("http://localhost:8080/v1/".into()));
        assert_eq!(cfg.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn empty_api_key_is_rejected_before_any_network_use() {
        let err = OpenAiClient::new(LlmConfig::new("  ", "m", None)).unwrap_err();
        assert!(matches!(
            err,
            McpgenError::Application(ApplicationError::MissingApiKey)
        ));
    }

    #[test]
    fn request_serializes_to_openai_shape() {
        let body = ChatCompletionRequest {
            model: "gpt-4",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
            temperature: 0.3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn response_parses_first_choice_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("short", 300), "short");
    }
}
