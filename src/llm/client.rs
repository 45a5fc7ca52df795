use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a single completion call
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to model provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model provider response could not be decoded: {0}")]
    Decode(String),
    #[error("model returned no text content")]
    EmptyResponse,
}

/// One completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Ask the model to answer with a single JSON object
    pub json_response: bool,
}

/// Text returned by the model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub text: String,
    /// The model stopped because it hit the output token limit
    pub truncated: bool,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: false,
        }
    }
}

/// A language model endpoint
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;
}

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// API root (from ANTHROPIC_BASE_URL, defaults to the public endpoint)
    pub base_url: String,
}

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;
        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self { api_key, base_url })
    }

    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }
}

/// Assistant prefill used to force a JSON object reply
const JSON_PREFILL: &str = "{";

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let mut messages = vec![Message {
            role: "user".to_string(),
            content: request.user_prompt,
        }];
        if request.json_response {
            messages.push(Message {
                role: "assistant".to_string(),
                content: JSON_PREFILL.to_string(),
            });
        }

        let body = AnthropicRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            temperature: Some(request.temperature),
            system: Some(request.system_prompt),
            messages,
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        let text: String = response
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let text = if request.json_response {
            format!("{}{}", JSON_PREFILL, text)
        } else {
            text
        };

        Ok(Completion {
            text,
            truncated: response.stop_reason.as_deref() == Some("max_tokens"),
        })
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url_trims_trailing_slash() {
        let mut config = AnthropicConfig::new("key".to_string());
        config.base_url = "http://localhost:8080/".to_string();
        let client = AnthropicClient::new(config);
        assert_eq!(client.messages_url(), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_request_serialization() {
        let body = AnthropicRequest {
            model: "m".to_string(),
            max_tokens: 10,
            temperature: Some(0.3),
            system: None,
            messages: vec![Message {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"content": [{"type": "text", "text": "\"a\": 1}"}], "stop_reason": "max_tokens"}"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content[0].text, "\"a\": 1}");
        assert_eq!(response.stop_reason.as_deref(), Some("max_tokens"));
    }
}
