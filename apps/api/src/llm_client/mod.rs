//! LLM client: the single point of entry for completion-endpoint calls.
//!
//! Speaks the OpenAI-compatible chat completions protocol (NVIDIA's hosted
//! endpoint by default). Endpoint settings are passed in explicitly; nothing
//! in this module reads the environment.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_MODEL: &str = "nvidia/llama-3.3-nemotron-super-49b-v1.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.8;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion endpoint did not respond within {0}s")]
    Timeout(u64),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) | LlmError::Timeout(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Parse(_) | LlmError::EmptyContent => false,
        }
    }
}

/// A required endpoint setting is absent.
#[derive(Debug, Error)]
#[error("{0} is not configured")]
pub struct ConfigError(pub &'static str);

/// Completion endpoint settings as supplied by the host application.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl LlmConfig {
    /// Checks that credential, base URL and model are all present.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError("API credential"))?;
        let base_url = self.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError("Completion endpoint base URL"));
        }
        let model = self.model.trim();
        if model.is_empty() {
            return Err(ConfigError("Model identifier"));
        }

        Ok(Endpoint {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint().is_ok()
    }
}

/// A validated endpoint. Only obtainable through [`LlmConfig::endpoint`].
#[derive(Clone)]
pub struct Endpoint {
    api_key: String,
    base_url: String,
    model: String,
}

impl Endpoint {
    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Anything that can turn a (system, prompt) pair into completion text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        endpoint: &Endpoint,
        system: &str,
        prompt: &str,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for the completion endpoint, with timeout and capped retry.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    timeout_secs: u64,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    #[cfg(test)]
    fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Makes a raw chat completion call, returning the full response object.
    /// Retries transport failures, 429 and 5xx with exponential backoff.
    pub async fn call(
        &self,
        endpoint: &Endpoint,
        system: &str,
        prompt: &str,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &endpoint.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
            stream: false,
        };
        let url = endpoint.completions_url();

        let mut attempt = 0;
        loop {
            match self.send_once(&url, endpoint, &request_body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    // Exponential backoff: base, 2x base, 4x base, ...
                    let delay = self.retry_base_delay * (1u32 << attempt.min(6));
                    attempt += 1;
                    warn!(
                        "LLM call attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        url: &str,
        endpoint: &Endpoint,
        request_body: &ChatRequest<'_>,
    ) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&endpoint.api_key)
            .header("accept", "application/json")
            .json(request_body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 || status.is_server_error() {
                warn!("LLM API returned {}: {}", status, body);
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        let chat_response: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }

    fn transport_error(&self, error: reqwest::Error) -> LlmError {
        if error.is_timeout() {
            LlmError::Timeout(self.timeout_secs)
        } else {
            LlmError::Http(error)
        }
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(
        &self,
        endpoint: &Endpoint,
        system: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let response = self.call(endpoint, system, prompt).await?;
        response
            .text()
            .map(str::to_owned)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Pulls the provider's message out of an error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(ApiErrorBody {
            error: Some(detail),
            ..
        }) => detail.message,
        Ok(ApiErrorBody {
            detail: Some(detail),
            ..
        }) => detail,
        _ => body,
    }
}

/// Removes reasoning output, markdown fences and surrounding prose so that
/// only the outermost JSON object of a completion remains.
pub fn clean_completion(text: &str) -> &str {
    let text = strip_reasoning(text);
    let text = strip_json_fences(text);
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Drops everything up to and including the last `</think>` tag. Reasoning
/// models sometimes omit the opening tag, so only the closing one is required.
fn strip_reasoning(text: &str) -> &str {
    const CLOSE: &str = "</think>";
    let text = text.trim();
    match text.rfind(CLOSE) {
        Some(end) => text[end + CLOSE.len()..].trim(),
        None => text,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
