//! Wire-level envelopes shared by the gateway and the client layer.

use crate::session::BrandContext;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";
pub const ROLE_SYSTEM: &str = "system";

/// One conversation entry. Immutable once created; ordering is insertion
/// order in the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: String,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl Message {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: role.to_string(),
            content: content.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_context: Option<BrandContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Uniform response envelope for `POST /api/chat`, success or failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn ok(response: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            response: Some(response.into()),
            success: true,
            session_id,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            response: None,
            success: false,
            session_id: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_has_id_role_and_timestamp() {
        let msg = Message::user("hello");
        assert!(!msg.id.is_empty());
        assert_eq!(msg.role, ROLE_USER);
        assert_eq!(msg.content, "hello");
        assert!(msg.timestamp > 0);
    }

    #[test]
    fn chat_request_serializes_camel_case() {
        let request = ChatRequest {
            message: "hi".into(),
            history: None,
            brand_context: Some(BrandContext {
                brand_name: Some("TechCorp".into()),
                ..BrandContext::default()
            }),
            session_id: Some("session_1_abc".into()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["brandContext"]["brandName"], "TechCorp");
        assert_eq!(json["sessionId"], "session_1_abc");
        assert!(json.get("history").is_none());
    }

    #[test]
    fn chat_response_failure_omits_response_field() {
        let envelope = ChatResponse::failure("boom");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("response").is_none());
        assert!(json.get("sessionId").is_none());
    }

    #[test]
    fn chat_response_round_trips_session_id() {
        let envelope = ChatResponse::ok("text", Some("session_2_xyz".into()));
        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: ChatResponse = serde_json::from_str(&json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.response.as_deref(), Some("text"));
        assert_eq!(parsed.session_id.as_deref(), Some("session_2_xyz"));
    }
}
