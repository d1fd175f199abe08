use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// Longest accepted chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid message")]
pub struct InvalidMessage;

/// A chat message as accepted from the widget, before sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: Option<String>,
}

impl ChatRequest {
    /// Lenient constructor from arbitrary JSON.
    ///
    /// Only `message` is checked; `user_id` is kept when it is a non-empty
    /// string and silently dropped otherwise. Unknown fields are ignored.
    pub fn from_loose(v: Value) -> Result<Self, InvalidMessage> {
        let Value::Object(mut fields) = v else {
            return Err(InvalidMessage);
        };

        let message = match fields.remove("message") {
            Some(Value::String(m)) => m,
            _ => return Err(InvalidMessage),
        };
        let len = message.chars().count();
        if len == 0 || len > MAX_MESSAGE_CHARS {
            return Err(InvalidMessage);
        }

        let user_id = match fields.remove("user_id") {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id),
            _ => None,
        };

        Ok(Self { message, user_id })
    }
}

/// Doc-friendly view of the inbound body for schema generation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequestDoc {
    /// 1 to 500 characters
    #[schema(example = "Hi")]
    pub message: String,
    /// Opaque session token; a fresh one is generated when absent
    #[schema(example = "abc")]
    pub user_id: Option<String>,
}

/// Body POSTed to the automation webhook.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RelayResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
