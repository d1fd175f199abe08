use axum::http::{HeaderMap, header};
use chrono::Utc;

use crate::config::Config;

/// `Origin`, falling back to `Referer`. Empty values count as absent;
/// unreadable ones as present but empty.
pub fn request_origin(headers: &HeaderMap) -> Option<String> {
    let non_empty = |name: header::HeaderName| headers.get(name).filter(|v| !v.is_empty());
    non_empty(header::ORIGIN)
        .or_else(|| non_empty(header::REFERER))
        .map(|v| v.to_str().unwrap_or_default().to_string())
}

/// A missing origin is treated as a same-origin or non-browser caller.
pub fn origin_allowed(cfg: &Config, origin: Option<&str>) -> bool {
    match origin {
        None => true,
        Some(origin) => cfg
            .allowed_origins
            .iter()
            .any(|allowed| origin.contains(allowed.as_str())),
    }
}

pub fn session_id_for(user_id: Option<&str>) -> String {
    match user_id {
        Some(id) => id.to_string(),
        None => format!("session_{}", Utc::now().timestamp_millis()),
    }
}
