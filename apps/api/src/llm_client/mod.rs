/// Completion Client — the single point of entry for all language-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion provider directly.
/// All completion requests MUST go through `CompletionClient`.
///
/// The client is built once at startup and injected through `AppState`. The wire
/// is behind `CompletionTransport` so tests drive the retry loop with a fake.
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod backoff;
pub mod pricing;
pub mod prompts;
pub mod tokens;

use backoff::{classify, BackoffPolicy, FailureClass, RateLimitBackoff, TransientErrorBackoff};
use pricing::estimate_cost;
use tokens::{TokenCounter, TokenizerFamily};

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion provider rejected credentials (status {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Completion provider rejected the request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Completion failed after {attempts} attempts: {last_message}")]
    Exhausted { attempts: u32, last_message: String },
}

/// A single failed exchange with the provider, before retry classification.
#[derive(Debug)]
pub enum TransportError {
    Status { status: u16, message: String },
    Connection(String),
    Decode(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// What the transport got back from one successful HTTP exchange.
#[derive(Debug, Clone, Default)]
pub struct RawCompletion {
    pub content: Option<String>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionResult {
    pub content: String,
    pub tokens_used: TokenUsage,
    pub estimated_cost: f64,
    pub model: String,
    pub attempts: u32,
}

#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn send(&self, request: &CompletionRequest<'_>) -> Result<RawCompletion, TransportError>;
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible chat completions transport
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

pub struct OpenAiTransport {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiTransport {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionTransport for OpenAiTransport {
    async fn send(&self, request: &CompletionRequest<'_>) -> Result<RawCompletion, TransportError> {
        let body = ChatRequest {
            model: request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: request.prompt,
            }],
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        Ok(RawCompletion {
            content: parsed.choices.into_iter().next().and_then(|c| c.message.content),
            usage: parsed.usage,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Request defaults applied by `complete`.
#[derive(Debug, Clone)]
pub struct CompletionDefaults {
    pub model: String,
    pub max_tokens: u32,
    pub retries: u32,
}

impl Default for CompletionDefaults {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo".to_string(),
            max_tokens: 2000,
            retries: 3,
        }
    }
}

#[derive(Clone)]
pub struct CompletionClient {
    transport: Arc<dyn CompletionTransport>,
    tokens: Arc<TokenCounter>,
    rate_limit: RateLimitBackoff,
    transient: TransientErrorBackoff,
    defaults: CompletionDefaults,
}

impl CompletionClient {
    pub fn new(transport: Arc<dyn CompletionTransport>, tokens: Arc<TokenCounter>) -> Self {
        Self {
            transport,
            tokens,
            rate_limit: RateLimitBackoff::default(),
            transient: TransientErrorBackoff::default(),
            defaults: CompletionDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: CompletionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builds the production client: OpenAI transport plus tokenizers from `TOKENIZER_DIR`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = OpenAiTransport::new(
            &config.openai_base_url,
            config.openai_api_key.clone(),
            Duration::from_secs(config.completion_timeout_secs),
        )?;
        let tokens = TokenCounter::load(config.tokenizer_dir.as_deref().map(Path::new));
        if !tokens.has_tokenizer(TokenizerFamily::for_model(&config.completion_model)) {
            info!(
                "No tokenizer loaded for {}; token counts use the character estimate",
                config.completion_model
            );
        }

        Ok(Self::new(Arc::new(transport), Arc::new(tokens)).with_defaults(CompletionDefaults {
            model: config.completion_model.clone(),
            max_tokens: config.completion_max_tokens,
            retries: config.completion_retries,
        }))
    }

    pub fn defaults(&self) -> &CompletionDefaults {
        &self.defaults
    }

    /// `generate_completion` with the configured model, token bound and retry budget.
    pub async fn complete(&self, prompt: &str) -> Result<CompletionResult, CompletionError> {
        let CompletionDefaults {
            model,
            max_tokens,
            retries,
        } = &self.defaults;
        self.generate_completion(prompt, *max_tokens, model, *retries)
            .await
    }

    /// Sends `prompt` to the provider, retrying per the backoff policies.
    ///
    /// `retries` is the total number of attempts (at least one is always made).
    /// 401/403/400 and other non-429 4xx fail immediately. 429 backs off on
    /// `RateLimitBackoff`; 5xx, connection failures and empty content back off on
    /// `TransientErrorBackoff`. Once the budget is spent the last failure is
    /// reported as `CompletionError::Exhausted`.
    pub async fn generate_completion(
        &self,
        prompt: &str,
        max_tokens: u32,
        model: &str,
        retries: u32,
    ) -> Result<CompletionResult, CompletionError> {
        let request = CompletionRequest {
            model,
            prompt,
            max_tokens,
        };
        let max_attempts = retries.max(1);
        let mut last_message = String::new();

        debug!(
            "Completion request: model={model}, est_prompt_tokens={}",
            self.tokens.count(model, prompt)
        );

        for attempt in 0..max_attempts {
            let delay = match self.transport.send(&request).await {
                Ok(raw) => match raw.content.as_deref().map(str::trim) {
                    // A reply holding only a code fence counts as empty.
                    Some(content) if !strip_code_fences(content).is_empty() => {
                        let content = content.to_string();
                        return Ok(self.finish(model, prompt, content, raw.usage, attempt + 1));
                    }
                    _ => {
                        last_message = "provider returned empty completion content".to_string();
                        self.transient.delay(attempt)
                    }
                },
                Err(e) => match classify(e) {
                    FailureClass::Fatal(err) => {
                        warn!("Completion failed without retry: {err}");
                        return Err(err);
                    }
                    FailureClass::RateLimited(msg) => {
                        last_message = msg;
                        self.rate_limit.delay(attempt)
                    }
                    FailureClass::Transient(msg) => {
                        last_message = msg;
                        self.transient.delay(attempt)
                    }
                },
            };

            if attempt + 1 < max_attempts {
                warn!(
                    "Completion attempt {}/{} failed ({}), retrying after {}ms...",
                    attempt + 1,
                    max_attempts,
                    last_message,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(CompletionError::Exhausted {
            attempts: max_attempts,
            last_message,
        })
    }

    fn finish(
        &self,
        model: &str,
        prompt: &str,
        content: String,
        usage: Option<TokenUsage>,
        attempts: u32,
    ) -> CompletionResult {
        let tokens_used = usage.unwrap_or_else(|| {
            let prompt_tokens = self.tokens.count(model, prompt);
            let completion_tokens = self.tokens.count(model, &content);
            TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }
        });
        let estimated_cost =
            estimate_cost(model, tokens_used.prompt_tokens, tokens_used.completion_tokens);

        info!(
            "Completion succeeded: model={model}, attempts={attempts}, total_tokens={}, cost=${:.4}",
            tokens_used.total_tokens, estimated_cost
        );

        CompletionResult {
            content,
            tokens_used,
            estimated_cost,
            model: model.to_string(),
            attempts,
        }
    }
}

/// Strips a surrounding ``` fence (with or without a language tag) from model output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag on the opening line, if any.
    let rest = match rest.find('\n') {
        Some(newline) if !rest[..newline].contains(' ') => &rest[newline + 1..],
        _ => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
