use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::relay::UpstreamRequest;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("webhook did not answer within {0:?}")]
    Timeout(Duration),
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("webhook status {0}")]
    Status(u16),
    #[error("json error: {0}")]
    Json(#[source] reqwest::Error),
}

impl UpstreamError {
    fn from_reqwest(err: reqwest::Error, timeout: Duration, decoding: bool) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if decoding {
            Self::Json(err)
        } else {
            Self::Request(err)
        }
    }
}

/// POSTs one chat message to the automation webhook and returns its JSON reply.
///
/// `timeout` bounds the whole exchange, body included. Nothing is retried.
pub async fn forward(
    http: &reqwest::Client,
    url: &Url,
    body: &UpstreamRequest,
    timeout: Duration,
) -> Result<Value, UpstreamError> {
    let res = http
        .post(url.clone())
        .timeout(timeout)
        .json(body)
        .send()
        .await
        .map_err(|e| UpstreamError::from_reqwest(e, timeout, false))?;
    if !res.status().is_success() {
        return Err(UpstreamError::Status(res.status().as_u16()));
    }
    res.json::<Value>()
        .await
        .map_err(|e| UpstreamError::from_reqwest(e, timeout, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request() -> UpstreamRequest {
        UpstreamRequest {
            message: "Hi".to_string(),
            session_id: "abc".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn forwards_payload_and_returns_json() {
        let server = MockServer::start_async().await;
        let hook = server.mock(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("content-type", "application/json")
                .json_body(json!({
                    "message": "Hi",
                    "sessionId": "abc",
                    "timestamp": "2024-01-01T00:00:00.000Z"
                }));
            then.status(200).json_body(json!({"output": "hello"}));
        });

        let url = Url::parse(&server.url("/hook")).unwrap();
        let reply = forward(&reqwest::Client::new(), &url, &request(), Duration::from_secs(5))
            .await
            .expect("webhook reply");

        hook.assert();
        assert_eq!(reply, json!({"output": "hello"}));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(502).body("bad gateway");
        });

        let url = Url::parse(&server.url("/hook")).unwrap();
        let err = forward(&reqwest::Client::new(), &url, &request(), Duration::from_secs(5))
            .await
            .expect_err("502 must fail");
        assert!(matches!(err, UpstreamError::Status(502)));
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200)
                .header("content-type", "application/json")
                .body("{not json");
        });

        let url = Url::parse(&server.url("/hook")).unwrap();
        let err = forward(&reqwest::Client::new(), &url, &request(), Duration::from_secs(5))
            .await
            .expect_err("malformed body must fail");
        assert!(matches!(err, UpstreamError::Json(_)));
    }

    #[tokio::test]
    async fn slow_webhook_times_out() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/hook");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"output": "late"}));
        });

        let url = Url::parse(&server.url("/hook")).unwrap();
        let timeout = Duration::from_millis(200);
        let err = forward(&reqwest::Client::new(), &url, &request(), timeout)
            .await
            .expect_err("slow webhook must time out");
        assert!(matches!(err, UpstreamError::Timeout(t) if t == timeout));
    }
}
