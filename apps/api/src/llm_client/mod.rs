/// LLM Client — the single point of entry for all text-generation calls in
/// Copyforge.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All text generation MUST go through `LlmClient::generate`, so the retry
/// policy and sampling settings are uniform system-wide.
///
/// Model: claude-sonnet-4-20250514 (hardcoded — do not make configurable to
/// prevent drift)
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod extract;

use self::extract::ExtractError;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all generation calls in Copyforge.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-20250514";

/// Token ceiling for long-form and creative calls.
pub const MAX_TOKENS_CREATIVE: u32 = 4096;
/// Token ceiling for short structured-extraction calls (outline planning).
pub const MAX_TOKENS_STRUCTURED: u32 = 1024;

/// Fixed sampling temperature for every call.
const TEMPERATURE: f32 = 0.7;

/// Retry policy: fixed interval, identical prompts every attempt. No jitter,
/// no exponential growth.
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("generation exhausted after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// The narrow contract the rest of the system depends on: one synchronous
/// request/response completion per call, no streaming, no partial state.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Production backend: the Anthropic Messages API over HTTPS.
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_key: String,
}

impl AnthropicBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request_body = MessagesRequest {
            model: MODEL,
            max_tokens,
            temperature: TEMPERATURE,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        parsed
            .text()
            .map(str::to_owned)
            .ok_or(LlmError::EmptyContent)
    }
}

/// The single LLM client used by every generation call site. Wraps a
/// `CompletionBackend` with bounded fixed-interval retry.
#[derive(Clone)]
pub struct LlmClient {
    backend: Arc<dyn CompletionBackend>,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_backend(Arc::new(AnthropicBackend::new(api_key)))
    }

    pub fn with_backend(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Issues one completion, retrying any backend failure at a fixed
    /// 2-second interval with identical prompts. Fails with
    /// `LlmError::Exhausted` after 3 consecutive failures.
    pub async fn generate(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(RETRY_DELAY).await;
            }

            match self.backend.complete(system, user, max_tokens).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("generation attempt {attempt}/{MAX_ATTEMPTS} failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    /// Convenience method that generates and deserializes the response as
    /// JSON, stripping markdown code fences if the model wraps them.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<T, LlmError> {
        let raw = self.generate(system, user, max_tokens).await?;
        Ok(extract::extract_as(&raw)?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{CompletionBackend, LlmClient, LlmError};

    pub enum StubReply {
        Text(String),
        Slow(Duration, String),
        Fail(String),
    }

    /// Scripted stand-in for the Anthropic backend. The script sees the
    /// 0-based call number plus both prompts and decides the outcome.
    pub struct ScriptedBackend {
        script: Box<dyn Fn(u32, &str, &str) -> StubReply + Send + Sync>,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        pub fn new(
            script: impl Fn(u32, &str, &str) -> StubReply + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                script: Box::new(script),
                calls: AtomicU32::new(0),
            })
        }

        pub fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(
            &self,
            system: &str,
            user: &str,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match (self.script)(call, system, user) {
                StubReply::Text(text) => Ok(text),
                StubReply::Slow(delay, text) => {
                    tokio::time::sleep(delay).await;
                    Ok(text)
                }
                StubReply::Fail(message) => Err(LlmError::Api {
                    status: 500,
                    message,
                }),
            }
        }
    }

    pub fn client_with(
        script: impl Fn(u32, &str, &str) -> StubReply + Send + Sync + 'static,
    ) -> (LlmClient, Arc<ScriptedBackend>) {
        let backend = ScriptedBackend::new(script);
        (LlmClient::with_backend(backend.clone()), backend)
    }
}
