use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    AppState,
    models::relay::{ChatRequest, InvalidMessage, RelayResponse, UpstreamRequest},
    services::webhook::{self, UpstreamError},
    utils::{origin_allowed, session_id_for},
};

pub mod reply;
pub mod sanitize;

/// Client errors. Upstream problems never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("Forbidden")]
    Forbidden,
    #[error(transparent)]
    InvalidMessage(#[from] InvalidMessage),
}

/// Origin check, body validation and sanitization, then relay.
///
/// `body` is `None` when it could not be read at all (e.g. over the size limit).
pub async fn dispatch_chat(
    state: &AppState,
    origin: Option<&str>,
    body: Option<&[u8]>,
) -> Result<RelayResponse, RelayError> {
    if !origin_allowed(&state.cfg, origin) {
        warn!("Blocked origin: {:?}", origin.unwrap_or_default());
        return Err(RelayError::Forbidden);
    }

    let body = body.ok_or(InvalidMessage)?;
    let payload: Value = serde_json::from_slice(body).map_err(|err| {
        debug!("Rejecting malformed chat body: {}", err);
        InvalidMessage
    })?;
    let request = ChatRequest::from_loose(payload)?;

    let message = sanitize::strip_script_tags(&request.message);
    if message.is_empty() {
        return Err(InvalidMessage.into());
    }

    Ok(relay_message(state, message, request.user_id.as_deref()).await)
}

/// Sends an already sanitized message upstream and always comes back with a reply.
pub async fn relay_message(
    state: &AppState,
    message: String,
    user_id: Option<&str>,
) -> RelayResponse {
    let cfg = &state.cfg;

    let Some(url) = &cfg.webhook_url else {
        warn!("No webhook configured; answering with the canned greeting");
        return reply_now(cfg.greeting_reply.clone());
    };

    let req = UpstreamRequest {
        message,
        session_id: session_id_for(user_id),
        timestamp: iso_now(),
    };
    info!("Relaying chat message (session={})", req.session_id);
    debug!("Relay payload: {:?}", req);

    let text = match webhook::forward(&state.http, url, &req, cfg.upstream_timeout).await {
        Ok(payload) => match state.replies.extract(&payload) {
            Some(text) => text,
            None => {
                warn!("Webhook reply had no recognizable text field: {}", payload);
                cfg.default_reply.clone()
            }
        },
        Err(err @ UpstreamError::Timeout(_)) => {
            warn!("Webhook call abandoned: {}", err);
            cfg.fallback_reply.clone()
        }
        Err(err) => {
            error!("Webhook call failed: {}", err);
            cfg.fallback_reply.clone()
        }
    };

    reply_now(text)
}

fn reply_now(response: String) -> RelayResponse {
    RelayResponse {
        response,
        timestamp: Some(iso_now()),
    }
}

fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
