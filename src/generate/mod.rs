//! Content generation with a bounded, classified retry policy between the
//! chat endpoint and the upstream completion API.

use crate::api::{Message, ROLE_ASSISTANT, ROLE_USER};
use crate::config::GenerationConfig;
use crate::prompt::PromptBuilder;
use crate::providers::{ChatTurn, CompletionBackend, CompletionError, CompletionOptions};
use crate::session::BrandContext;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Terminal generation failures. Display strings are the stable user-facing
/// sentences; raw upstream text only appears inside `Failed`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("The assistant is experiencing high demand right now. Please try again in a moment.")]
    HighDemand,
    #[error("Authentication with the content service failed. Please check the server configuration.")]
    Auth,
    #[error("The content service rejected the request. Please try rephrasing your message.")]
    InvalidRequest,
    #[error("The content service is temporarily unavailable. Please try again shortly.")]
    Unavailable,
    #[error("Could not reach the content service. Please check your connection and try again.")]
    Network,
    #[error("Unable to generate content: {0}")]
    Failed(String),
}

pub struct ContentGenerator {
    backend: Arc<dyn CompletionBackend>,
    prompts: PromptBuilder,
    options: CompletionOptions,
    max_retries: u32,
    backoff_unit: Duration,
}

impl ContentGenerator {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        config: &GenerationConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            backend,
            prompts: PromptBuilder::new()?,
            options: CompletionOptions {
                model: config.model.clone(),
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
            max_retries: config.max_retries.max(1),
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        })
    }

    /// Replace the 1-second backoff unit. Tests pass a few milliseconds so
    /// the schedule stays observable without real waits.
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// System prompt first, then prior turns with system-role entries
    /// dropped, then the new user message last.
    fn build_turns(
        &self,
        message: &str,
        history: &[Message],
        brand_context: Option<&BrandContext>,
    ) -> anyhow::Result<Vec<ChatTurn>> {
        let system_prompt = self.prompts.build(message, brand_context)?;
        let mut turns = Vec::with_capacity(history.len() + 2);
        turns.push(ChatTurn::system(system_prompt));
        for entry in history {
            match entry.role.as_str() {
                ROLE_USER => turns.push(ChatTurn::user(entry.content.clone())),
                ROLE_ASSISTANT => turns.push(ChatTurn::assistant(entry.content.clone())),
                _ => {}
            }
        }
        turns.push(ChatTurn::user(message));
        Ok(turns)
    }

    /// `None` means the failure class never retries. Rate limiting backs off
    /// exponentially from one unit; every other retryable class waits a
    /// single unit.
    fn retry_delay(&self, error: &CompletionError, attempt: u32) -> Option<Duration> {
        match error {
            CompletionError::Auth(_) | CompletionError::InvalidRequest(_) => None,
            CompletionError::RateLimited => {
                Some(self.backoff_unit * 2u32.saturating_pow(attempt))
            }
            CompletionError::Server { .. }
            | CompletionError::Network(_)
            | CompletionError::EmptyCompletion
            | CompletionError::Other(_) => Some(self.backoff_unit),
        }
    }

    fn terminal_error(error: &CompletionError) -> GenerateError {
        match error {
            CompletionError::RateLimited => GenerateError::HighDemand,
            CompletionError::Auth(_) => GenerateError::Auth,
            CompletionError::InvalidRequest(_) => GenerateError::InvalidRequest,
            CompletionError::Server { .. } => GenerateError::Unavailable,
            CompletionError::Network(_) => GenerateError::Network,
            CompletionError::EmptyCompletion | CompletionError::Other(_) => {
                GenerateError::Failed(error.to_string())
            }
        }
    }

    pub async fn generate(
        &self,
        message: &str,
        history: &[Message],
        brand_context: Option<&BrandContext>,
    ) -> Result<String, GenerateError> {
        let turns = self
            .build_turns(message, history, brand_context)
            .map_err(|e| GenerateError::Failed(e.to_string()))?;

        let mut last_error: Option<CompletionError> = None;
        for attempt in 0..self.max_retries {
            match self.backend.complete(&turns, &self.options).await {
                Ok(text) => {
                    if attempt > 0 {
                        tracing::info!(attempt, "completion recovered after retries");
                    }
                    return Ok(text);
                }
                Err(error) => {
                    let Some(delay) = self.retry_delay(&error, attempt) else {
                        tracing::warn!(error = %error, "non-retryable completion failure");
                        return Err(Self::terminal_error(&error));
                    };
                    if attempt + 1 < self.max_retries {
                        tracing::warn!(
                            error = %error,
                            attempt = attempt + 1,
                            max_retries = self.max_retries,
                            "completion attempt failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(error);
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| CompletionError::Other("no completion attempts were made".into()));
        tracing::error!(error = %error, "completion retries exhausted");
        Err(Self::terminal_error(&error))
    }
}
