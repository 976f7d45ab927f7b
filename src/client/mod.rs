//! Request layer for callers of the chat gateway, with its own retry and
//! timeout policy independent of the server's. Transient failures (5xx,
//! connection errors) retry with linear backoff; everything else is
//! terminal on the first occurrence.

use crate::api::{ChatRequest, ChatResponse};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Per-attempt timeout. Expiry is terminal, never retried.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Initial attempt plus two retries.
const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("The request timed out. Please try again.")]
    Timeout,
    #[error("The server is handling too many requests right now. Please wait a moment and try again.")]
    RateLimited,
    #[error("The server took too long to respond. Please try again.")]
    ServerTimeout,
    #[error("The service is temporarily unavailable. Please try again shortly.")]
    Unavailable,
    #[error("Could not reach the server. Please check your connection and try again.")]
    Network,
    #[error("{0}")]
    Server(String),
    #[error("unexpected response from server: {0}")]
    InvalidResponse(String),
}

pub struct ChatClient {
    http: Client,
    base_url: String,
    max_attempts: u32,
    backoff_unit: Duration,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
            max_attempts: MAX_ATTEMPTS,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }

    /// Shrink the backoff unit so tests observe the schedule without waits.
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let url = self.endpoint("/api/chat");
        let mut attempt = 0;
        loop {
            attempt += 1;

            let response = match self.http.post(&url).json(request).send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => return Err(ClientError::Timeout),
                Err(e) => {
                    if attempt < self.max_attempts {
                        tracing::warn!(error = %e, attempt, "request failed, retrying");
                        tokio::time::sleep(self.backoff_unit * attempt).await;
                        continue;
                    }
                    return Err(ClientError::Network);
                }
            };

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<ChatResponse>()
                    .await
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()));
            }

            match status.as_u16() {
                429 => return Err(ClientError::RateLimited),
                408 => return Err(ClientError::ServerTimeout),
                code if code >= 500 => {
                    if attempt < self.max_attempts {
                        tracing::warn!(code, attempt, "server error, retrying");
                        tokio::time::sleep(self.backoff_unit * attempt).await;
                        continue;
                    }
                    return Err(ClientError::Unavailable);
                }
                code => {
                    let detail = response
                        .json::<ChatResponse>()
                        .await
                        .ok()
                        .and_then(|body| body.error)
                        .unwrap_or_else(|| format!("server error ({code})"));
                    return Err(ClientError::Server(detail));
                }
            }
        }
    }

    /// Single best-effort probe; false on any failure, never retries.
    pub async fn health_check(&self) -> bool {
        match self.http.get(self.endpoint("/api/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ChatClient {
        ChatClient::new(server.uri()).with_backoff_unit(Duration::from_millis(1))
    }

    fn request() -> ChatRequest {
        ChatRequest {
            message: "write a tagline".into(),
            ..ChatRequest::default()
        }
    }

    fn ok_body() -> serde_json::Value {
        serde_json::json!({"response": "Test marketing response", "success": true})
    }

    #[tokio::test]
    async fn success_returns_parsed_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client(&server).send_message(&request()).await.unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.response.as_deref(), Some("Test marketing response"));
    }

    #[tokio::test]
    async fn server_errors_retry_then_succeed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client(&server).send_message(&request()).await.unwrap();
        assert!(envelope.success);
    }

    #[tokio::test]
    async fn server_errors_exhaust_into_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = client(&server).send_message(&request()).await.unwrap_err();
        assert_eq!(err, ClientError::Unavailable);
    }

    #[tokio::test]
    async fn rate_limit_is_terminal_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).send_message(&request()).await.unwrap_err();
        assert_eq!(err, ClientError::RateLimited);
    }

    #[tokio::test]
    async fn request_timeout_status_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(408))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).send_message(&request()).await.unwrap_err();
        assert_eq!(err, ClientError::ServerTimeout);
    }

    #[tokio::test]
    async fn other_statuses_carry_the_server_error_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "error": "message cannot be empty",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).send_message(&request()).await.unwrap_err();
        assert_eq!(err, ClientError::Server("message cannot be empty".into()));
    }

    #[tokio::test]
    async fn other_statuses_without_a_body_get_a_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).send_message(&request()).await.unwrap_err();
        assert_eq!(err, ClientError::Server("server error (403)".into()));
    }

    #[tokio::test]
    async fn connection_failures_exhaust_into_network_error() {
        let unreachable = ChatClient::new("http://127.0.0.1:1")
            .with_backoff_unit(Duration::from_millis(1));
        let err = unreachable.send_message(&request()).await.unwrap_err();
        assert_eq!(err, ClientError::Network);
    }

    #[tokio::test]
    async fn health_check_reports_both_directions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
            })))
            .mount(&server)
            .await;

        assert!(client(&server).health_check().await);
        assert!(!ChatClient::new("http://127.0.0.1:1").health_check().await);
    }
}
