use thiserror::Error;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Failure classes reported by a completion backend. The generator's retry
/// policy branches on these variants, so every upstream failure must map to
/// exactly one of them.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("completion API rate limited (429)")]
    RateLimited,
    #[error("completion API authentication failed: {0}")]
    Auth(String),
    #[error("completion API rejected the request: {0}")]
    InvalidRequest(String),
    #[error("completion API server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("network error calling completion API: {0}")]
    Network(String),
    #[error("completion API returned an empty response")]
    EmptyCompletion,
    #[error("completion API error: {0}")]
    Other(String),
}

impl CompletionError {
    /// Map a non-success HTTP status plus response body to an error class.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = truncate_error_body(body);
        match status {
            429 => Self::RateLimited,
            401 => Self::Auth(message),
            400 => Self::InvalidRequest(message),
            s if s >= 500 => Self::Server { status: s, message },
            s => Self::Other(format!("unexpected status {s}: {message}")),
        }
    }
}

/// Bound the upstream error body before it reaches logs or error chains.
pub fn truncate_error_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY_CHARS;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
