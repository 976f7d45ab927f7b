//! Axum-based HTTP gateway for the chat assistant:
//! - request body size limit (64KB max)
//! - request timeout (30s) answered with 408
//! - permissive CORS for the browser client
//! - static single-page bundle served for non-API paths in production

mod handlers;
mod sanitize;

pub use sanitize::{MAX_HISTORY_LEN, MAX_MESSAGE_CHARS, sanitize_message, validate_chat_request};

use crate::config::Config;
use crate::generate::ContentGenerator;
use crate::providers::OpenAiBackend;
use crate::session::BrandContextStore;
use crate::validate::OutputValidator;
use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use handlers::{handle_chat, handle_health};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB) — prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Whole-request timeout; still-open requests are answered with 408
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Generation deadline, one second inside the response-time contract to
/// leave headroom for serialization
pub const GENERATION_DEADLINE_SECS: u64 = 29;
pub const SERVICE_NAME: &str = "marketing-mavericks-agent";

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ContentGenerator>,
    pub sessions: Arc<BrandContextStore>,
    pub validator: Arc<OutputValidator>,
}

impl AppState {
    pub fn new(generator: Arc<ContentGenerator>, sessions: Arc<BrandContextStore>) -> Result<Self> {
        Ok(Self {
            generator,
            sessions,
            validator: Arc::new(OutputValidator::new()?),
        })
    }
}

pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/chat", post(handle_chat))
        .with_state(state);

    if let Some(dir) = static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    app.layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
}

/// Run the HTTP gateway on the configured address.
pub async fn run_gateway(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_gateway_with_listener(listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    if config.api_key.is_none() {
        tracing::warn!(
            "OPENAI_API_KEY is not set; chat requests will fail until a key is configured"
        );
    }

    let backend = OpenAiBackend::new(config.api_key.as_deref());
    let generator = Arc::new(ContentGenerator::new(Arc::new(backend), &config.generation)?);
    let sessions = Arc::new(BrandContextStore::new());
    let state = AppState::new(generator, sessions)?;

    let static_dir = config
        .gateway
        .production
        .then(|| config.gateway.static_dir.clone());
    let app = build_router(state, static_dir.as_deref());

    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, production = config.gateway.production, "gateway listening");
    axum::serve(listener, app).await?;

    Ok(())
}
