use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use tracing::{debug, info};

use crate::{
    AppState,
    handlers::{self, RelayError},
    models::{common::ErrorMessage, relay::RelayResponse},
    utils::request_origin,
};

#[utoipa::path(
    post,
    path = "/relay",
    tag = "relay",
    params(
        ("Origin" = Option<String>, Header, description = "Must contain an allow-listed substring when present. `Referer` is checked if `Origin` is absent.", example = "https://example-allowed.test")
    ),
    request_body = crate::models::relay::ChatRequestDoc,
    responses(
        (status = 200, description = "Reply to show in the widget. Upstream failures also land here with a friendly fallback.", body = RelayResponse),
        (status = 400, description = "Bad Request - message missing, not a string, empty or over 500 characters", body = ErrorMessage),
        (status = 403, description = "Forbidden - origin not allowed", body = ErrorMessage),
        (status = 405, description = "Method not allowed", body = ErrorMessage)
    )
)]
pub async fn receive_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorMessage>)> {
    let origin = request_origin(&headers);
    info!(
        "Incoming chat message (origin={})",
        origin.as_deref().unwrap_or("<none>")
    );

    // Unreadable bodies (too large, broken stream) are invalid messages, not 413s.
    let body = body
        .inspect_err(|rejection| debug!("Chat body rejected: {}", rejection))
        .ok();

    let reply = handlers::dispatch_chat(&state, origin.as_deref(), body.as_deref())
        .await
        .map_err(|e| {
            let status = match e {
                RelayError::Forbidden => StatusCode::FORBIDDEN,
                RelayError::InvalidMessage(_) => StatusCode::BAD_REQUEST,
            };
            (status, Json(ErrorMessage::new(e.to_string())))
        })?;

    Ok(([(header::CACHE_CONTROL, "no-cache")], Json(reply)))
}

/// CORS headers are added by the router's cors layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> (StatusCode, Json<ErrorMessage>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorMessage::new("Method not allowed")),
    )
}
