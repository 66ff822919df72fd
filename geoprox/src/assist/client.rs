//! Chat-completions transport.

use super::AssistError;
use crate::wfs::AsyncHttpClient;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// OpenRouter chat-completions endpoint.
pub const DEFAULT_AI_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model requested by default.
pub const DEFAULT_AI_MODEL: &str = "x-ai/grok-4-fast";

/// Low temperature keeps the JSON answers stable.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

pub const DEFAULT_EXTRACTION_MAX_TOKENS: u32 = 500;

pub const DEFAULT_COMPLIANCE_MAX_TOKENS: u32 = 800;

/// Endpoint, model and limits for the collaborators.
///
/// # Example
///
/// ```
/// use geoprox::assist::AssistConfig;
///
/// let config = AssistConfig::new().with_api_key(Some("sk-test".to_string()));
/// assert_eq!(config.model(), "x-ai/grok-4-fast");
/// assert_eq!(config.api_key(), Some("sk-test"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AssistConfig {
    endpoint: String,
    model: String,
    temperature: f32,
    extraction_max_tokens: u32,
    compliance_max_tokens: u32,
    api_key: Option<String>,
}

impl AssistConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_extraction_max_tokens(mut self, tokens: u32) -> Self {
        self.extraction_max_tokens = tokens;
        self
    }

    pub fn with_compliance_max_tokens(mut self, tokens: u32) -> Self {
        self.compliance_max_tokens = tokens;
        self
    }

    /// Blank keys count as missing.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn extraction_max_tokens(&self) -> u32 {
        self.extraction_max_tokens
    }

    pub fn compliance_max_tokens(&self) -> u32 {
        self.compliance_max_tokens
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            extraction_max_tokens: DEFAULT_EXTRACTION_MAX_TOKENS,
            compliance_max_tokens: DEFAULT_COMPLIANCE_MAX_TOKENS,
            api_key: None,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Sends single-turn prompts to the configured endpoint.
pub struct ChatClient<C> {
    http: Arc<C>,
    config: AssistConfig,
    api_key: String,
}

impl<C: AsyncHttpClient> ChatClient<C> {
    /// Fails with [`AssistError::MissingApiKey`] when no key is configured.
    pub fn new(http: Arc<C>, config: AssistConfig) -> Result<Self, AssistError> {
        let api_key = config
            .api_key()
            .map(str::to_string)
            .ok_or(AssistError::MissingApiKey)?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Sends `prompt` as a user message and returns the answer text.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, AssistError> {
        let request = ChatRequest {
            model: self.config.model(),
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature(),
            max_tokens,
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| AssistError::Transport(e.to_string()))?;

        debug!(
            endpoint = self.config.endpoint(),
            model = self.config.model(),
            max_tokens = max_tokens,
            "Sending chat completion"
        );
        let response = self
            .http
            .post_json(self.config.endpoint(), &body, Some(&self.api_key))
            .await
            .map_err(|e| AssistError::Transport(e.to_string()))?;

        let payload: Option<Value> = serde_json::from_str(&response.body).ok();

        if !response.is_success() {
            let message = payload
                .as_ref()
                .and_then(|v| v.pointer("/error/message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            warn!(status = response.status, message = %message, "Chat completion rejected");
            return Err(AssistError::AiRequest {
                status: response.status,
                message,
            });
        }

        payload
            .as_ref()
            .and_then(|v| v.pointer("/choices/0/message/content"))
            .and_then(Value::as_str)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                AssistError::AiResponseShape(
                    "response has no choices[0].message.content".to_string(),
                )
            })
    }
}
