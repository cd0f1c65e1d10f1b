//! Chat-completion call: build the two-message exchange and send it once.
//!
//! This module is intentionally thin. The request is a single synchronous
//! (awaited once, non-streaming) POST with no retry and no backoff: the
//! run either gets a reply or fails, and a transport or API error
//! propagates unmodified to the caller. All prompt content comes in from
//! the orchestrator; nothing here rewrites it.
//!
//! The [`ChatProvider`] trait is the seam for tests and for custom
//! endpoints; [`OpenAiChat`] is the production implementation, speaking
//! the OpenAI `/chat/completions` wire format.

use crate::error::AnalyzeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Default completion endpoint; override with `OPENAI_BASE_URL`.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The instruction-vs-content channel of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// One message of the chat exchange.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Build the standard two-message exchange: instructions as the system
/// message, the combined document text as the user message.
pub fn build_messages(prompt: &str, content: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(prompt), ChatMessage::user(content)]
}

/// A chat-completion backend.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one exchange and return the reply text.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AnalyzeError>;

    /// Short provider identifier for logs.
    fn name(&self) -> &str;
}

/// OpenAI-compatible [`ChatProvider`] over `reqwest`.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl std::fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiChat {
    /// Build a provider from the process environment.
    ///
    /// Reads `OPENAI_API_KEY` (absence or an empty value is fatal here, at
    /// the point the Responder is built — not at program start) and an
    /// optional `OPENAI_BASE_URL` endpoint override.
    pub fn from_env(
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, AnalyzeError> {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            return Err(AnalyzeError::ApiKeyMissing);
        }

        let mut base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client: http_client(timeout_secs),
            api_key,
            base_url,
            model: model.into(),
            temperature,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AnalyzeError> {
        let api_messages: Vec<ApiMessage<'_>> = messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        let body = ChatRequest {
            model: &self.model,
            messages: &api_messages,
            temperature: self.temperature,
        };

        debug!(
            model = %self.model,
            temperature = self.temperature,
            "sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(AnalyzeError::Http)?;

        if !status.is_success() {
            error!("chat API error {status}: {text}");
            return Err(AnalyzeError::ApiStatus {
                status: status.as_u16(),
                detail: text,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AnalyzeError::EmptyResponse {
                model: self.model.clone(),
            })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Shared HTTP client with explicit timeouts and a crate user-agent.
fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("doc2report/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("default HTTP client construction must not fail")
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ApiMessage<'a>],
    temperature: f32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn build_messages_puts_instructions_in_system_role() {
        let messages = build_messages("analyse this", "document body");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "analyse this");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "document body");
    }

    #[test]
    fn request_serialises_to_expected_shape() {
        let api_messages = vec![
            ApiMessage {
                role: "system",
                content: "p",
            },
            ApiMessage {
                role: "user",
                content: "c",
            },
        ];
        let body = ChatRequest {
            model: "gpt-4",
            messages: &api_messages,
            temperature: 0.0,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-4");
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "c");
    }

    #[test]
    fn response_parsing_takes_first_choice() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "the findings"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "the findings");
    }

    #[test]
    #[serial]
    fn missing_api_key_is_fatal_at_construction() {
        let saved = std::env::var("OPENAI_API_KEY").ok();
        std::env::remove_var("OPENAI_API_KEY");

        let err = OpenAiChat::from_env("gpt-4", 0.0, 120).unwrap_err();
        assert!(matches!(err, AnalyzeError::ApiKeyMissing));

        if let Some(key) = saved {
            std::env::set_var("OPENAI_API_KEY", key);
        }
    }

    #[test]
    #[serial]
    fn empty_api_key_counts_as_missing() {
        let saved = std::env::var("OPENAI_API_KEY").ok();
        std::env::set_var("OPENAI_API_KEY", "");

        let err = OpenAiChat::from_env("gpt-4", 0.0, 120).unwrap_err();
        assert!(matches!(err, AnalyzeError::ApiKeyMissing));

        match saved {
            Some(key) => std::env::set_var("OPENAI_API_KEY", key),
            None => std::env::remove_var("OPENAI_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn base_url_override_is_trimmed() {
        let saved_key = std::env::var("OPENAI_API_KEY").ok();
        let saved_url = std::env::var("OPENAI_BASE_URL").ok();
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        std::env::set_var("OPENAI_BASE_URL", "http://localhost:8080/v1///");

        let provider = OpenAiChat::from_env("gpt-4", 0.0, 120).unwrap();
        assert_eq!(provider.base_url, "http://localhost:8080/v1");

        match saved_key {
            Some(key) => std::env::set_var("OPENAI_API_KEY", key),
            None => std::env::remove_var("OPENAI_API_KEY"),
        }
        match saved_url {
            Some(url) => std::env::set_var("OPENAI_BASE_URL", url),
            None => std::env::remove_var("OPENAI_BASE_URL"),
        }
    }
}
