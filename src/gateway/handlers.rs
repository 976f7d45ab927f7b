use super::sanitize::validate_chat_request;
use super::{AppState, GENERATION_DEADLINE_SECS, SERVICE_NAME};
use crate::api::ChatResponse;
use crate::prompt::detect_content_type;
use crate::session::{BrandContext, BrandContextStore, generate_session_id};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use chrono::Utc;
use std::time::Duration;

/// GET /api/health — liveness probe, always public
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "service": SERVICE_NAME,
    }))
}

fn failure(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ChatResponse>) {
    (status, Json(ChatResponse::failure(error)))
}

/// Resolve the effective brand context for a request. Four mutually
/// exclusive cases, evaluated in order; an explicitly-sent empty context
/// counts as absent. The second element is a newly generated session id to
/// return to the caller, set only when one was synthesized here.
pub(super) fn resolve_brand_context(
    sessions: &BrandContextStore,
    brand_context: Option<BrandContext>,
    session_id: Option<String>,
) -> (Option<BrandContext>, Option<String>) {
    let brand_context = brand_context.filter(|ctx| !ctx.is_empty());
    match (brand_context, session_id) {
        (Some(ctx), Some(id)) => {
            sessions.set(&id, ctx.clone());
            (Some(ctx), None)
        }
        (None, Some(id)) => (sessions.get(&id), None),
        (Some(ctx), None) => {
            let id = generate_session_id();
            sessions.set(&id, ctx.clone());
            (Some(ctx), Some(id))
        }
        (None, None) => (None, None),
    }
}

/// POST /api/chat — validate, resolve brand context, race generation
/// against the deadline, answer with the uniform envelope.
pub(super) async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> impl IntoResponse {
    let Json(raw) = match body {
        Ok(body) => body,
        Err(e) => return failure(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}")),
    };

    let request = match validate_chat_request(&raw) {
        Ok(request) => request,
        Err(message) => return failure(StatusCode::BAD_REQUEST, message),
    };

    let (brand_context, new_session_id) =
        resolve_brand_context(&state.sessions, request.brand_context, request.session_id);

    let history = request.history.unwrap_or_default();
    let generation = state
        .generator
        .generate(&request.message, &history, brand_context.as_ref());

    match tokio::time::timeout(Duration::from_secs(GENERATION_DEADLINE_SECS), generation).await {
        Err(_elapsed) => {
            tracing::warn!("generation exceeded the {GENERATION_DEADLINE_SECS}s deadline");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate response: the request timed out before completion",
            )
        }
        Ok(Err(error)) => {
            tracing::error!(error = %error, "generation failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate response: {error}"),
            )
        }
        Ok(Ok(text)) => {
            for issue in state
                .validator
                .check(detect_content_type(&request.message), &text)
            {
                tracing::warn!(%issue, "generated content failed an output check");
            }
            (StatusCode::OK, Json(ChatResponse::ok(text, new_session_id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn techcorp() -> BrandContext {
        BrandContext {
            brand_name: Some("TechCorp".into()),
            ..BrandContext::default()
        }
    }

    #[test]
    fn context_and_session_id_stores_under_that_id() {
        let sessions = BrandContextStore::new();
        let (effective, new_id) = resolve_brand_context(
            &sessions,
            Some(techcorp()),
            Some("session_1_known".into()),
        );

        assert_eq!(effective, Some(techcorp()));
        assert!(new_id.is_none());
        assert_eq!(sessions.get("session_1_known"), Some(techcorp()));
    }

    #[test]
    fn known_session_id_loads_stored_context() {
        let sessions = BrandContextStore::new();
        sessions.set("session_1_known", techcorp());

        let (effective, new_id) =
            resolve_brand_context(&sessions, None, Some("session_1_known".into()));

        assert_eq!(effective, Some(techcorp()));
        assert!(new_id.is_none());
    }

    #[test]
    fn unknown_session_id_without_context_proceeds_bare() {
        let sessions = BrandContextStore::new();
        let (effective, new_id) =
            resolve_brand_context(&sessions, None, Some("session_1_missing".into()));

        assert!(effective.is_none());
        assert!(new_id.is_none());
        assert!(sessions.is_empty());
    }

    #[test]
    fn context_without_session_id_synthesizes_one() {
        let sessions = BrandContextStore::new();
        let (effective, new_id) = resolve_brand_context(&sessions, Some(techcorp()), None);

        assert_eq!(effective, Some(techcorp()));
        let id = new_id.expect("a session id should be generated");
        assert!(id.starts_with("session_"));
        assert_eq!(sessions.get(&id), Some(techcorp()));
    }

    #[test]
    fn neither_context_nor_session_id_is_bare() {
        let sessions = BrandContextStore::new();
        let (effective, new_id) = resolve_brand_context(&sessions, None, None);

        assert!(effective.is_none());
        assert!(new_id.is_none());
    }

    #[test]
    fn empty_context_object_counts_as_absent() {
        let sessions = BrandContextStore::new();
        let (effective, new_id) =
            resolve_brand_context(&sessions, Some(BrandContext::default()), None);

        assert!(effective.is_none());
        assert!(new_id.is_none());
        assert!(sessions.is_empty());
    }
}
