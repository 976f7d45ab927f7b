use super::error::{CompletionError, truncate_error_body};
use super::traits::CompletionBackend;
use super::types::{ChatTurn, CompletionOptions};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI-compatible chat-completion client.
pub struct OpenAiBackend {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
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

impl OpenAiBackend {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Point the backend at a different host (test servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_request(turns: &[ChatTurn], options: &CompletionOptions) -> CompletionRequest {
        CompletionRequest {
            model: options.model.clone(),
            messages: turns
                .iter()
                .map(|turn| WireMessage {
                    role: turn.role.as_str(),
                    content: turn.content.clone(),
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }

    async fn call_api(
        &self,
        turns: &[ChatTurn],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let Some(auth_header) = self.cached_auth_header.as_deref() else {
            return Err(CompletionError::Auth(
                "OpenAI API key not set. Set OPENAI_API_KEY or add api_key to config.toml.".into(),
            ));
        };

        let request = Self::build_request(turns, options);
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::from_status(status.as_u16(), &body));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            CompletionError::Other(format!("response JSON decode failed: {}", truncate_error_body(&e.to_string())))
        })?;

        let text = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(CompletionError::EmptyCompletion);
        }
        Ok(text)
    }
}

impl CompletionBackend for OpenAiBackend {
    fn complete<'a>(
        &'a self,
        turns: &'a [ChatTurn],
        options: &'a CompletionOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(self.call_api(turns, options))
    }
}
