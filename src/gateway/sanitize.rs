use crate::api::{ChatRequest, Message};
use crate::session::BrandContext;
use serde_json::Value;

pub const MAX_MESSAGE_CHARS: usize = 5000;
pub const MAX_HISTORY_LEN: usize = 50;

/// Replace embedded NUL characters with spaces, trim, and collapse runs of
/// whitespace to a single space. Idempotent.
pub fn sanitize_message(raw: &str) -> String {
    let without_nul = raw.replace('\0', " ");
    without_nul.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Field-by-field validation of a chat request body, in contract order:
/// first failure wins and names the violated constraint.
pub fn validate_chat_request(body: &Value) -> Result<ChatRequest, String> {
    let message = match body.get("message") {
        Some(Value::String(s)) => s,
        _ => return Err("message must be a string".into()),
    };
    let message = sanitize_message(message);
    if message.is_empty() {
        return Err("message cannot be empty".into());
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(format!(
            "message exceeds maximum length of {MAX_MESSAGE_CHARS} characters"
        ));
    }

    let history = match body.get("history") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => {
            if entries.len() > MAX_HISTORY_LEN {
                return Err(format!(
                    "history exceeds maximum length of {MAX_HISTORY_LEN} messages"
                ));
            }
            let mut history = Vec::with_capacity(entries.len());
            for entry in entries {
                let role = entry.get("role").and_then(Value::as_str).unwrap_or_default();
                let content = entry.get("content").and_then(Value::as_str);
                if role.is_empty() || content.is_none() {
                    return Err("history entries must include a role and content".into());
                }
                history.push(Message {
                    id: entry
                        .get("id")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    role: role.to_string(),
                    content: content.unwrap_or_default().to_string(),
                    timestamp: entry
                        .get("timestamp")
                        .and_then(Value::as_i64)
                        .unwrap_or_default(),
                });
            }
            history
        }
        Some(_) => return Err("history must be an array".into()),
    };

    let brand_context = match body.get("brandContext") {
        None | Some(Value::Null) => None,
        Some(value @ Value::Object(_)) => serde_json::from_value::<BrandContext>(value.clone())
            .map(Some)
            .map_err(|_| "brandContext fields must be strings".to_string())?,
        Some(_) => return Err("brandContext must be an object".into()),
    };

    let session_id = body
        .get("sessionId")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ChatRequest {
        message,
        history: Some(history),
        brand_context,
        session_id,
    })
}
