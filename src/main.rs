mod apidoc;
mod config;
mod handlers;
mod models;
mod routes;
mod services;
mod utils;

use std::sync::Arc;

use config::{Config, ConfigError};
use handlers::reply::ReplyExtractors;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub http: reqwest::Client,
    pub replies: Arc<ReplyExtractors>,
}

impl AppState {
    pub fn new(cfg: Config, http: reqwest::Client) -> Self {
        let replies = Arc::new(ReplyExtractors::new(&cfg.reply_fields, &cfg.nested_reply_key));
        Self { cfg, http, replies }
    }
}

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env()?;
    let http = reqwest::Client::builder().build()?;
    // Compute before moving state anywhere
    let addr = format!("{}:{}", cfg.app_host, cfg.app_port);

    match &cfg.webhook_url {
        Some(url) => tracing::info!(
            "Relaying to webhook at {} (timeout {:?})",
            url.host_str().unwrap_or("<no host>"),
            cfg.upstream_timeout
        ),
        None => tracing::warn!("RELAY_WEBHOOK_URL not set; serving canned greetings only"),
    }

    let app = routes::build_router(AppState::new(cfg, http));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!("Chat relay listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .map_err(StartupError::Serve)
}
