use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

pub const DEFAULT_REPLY_FIELDS: &[&str] = &["output", "response", "reply", "message", "text"];

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind host (e.g., 0.0.0.0)
    pub app_host: String,
    /// HTTP bind port (e.g., 8080)
    pub app_port: u16,

    /// Automation webhook receiving chat messages.
    /// `None` puts the relay in canned-greeting mode.
    pub webhook_url: Option<Url>,
    /// Substrings an `Origin`/`Referer` header must contain to be accepted
    pub allowed_origins: Vec<String>,
    /// Hard bound on the whole upstream exchange (connect, headers, body)
    pub upstream_timeout: Duration,

    /// Ordered reply field candidates, checked at top level then under `nested_reply_key`
    pub reply_fields: Vec<String>,
    pub nested_reply_key: String,

    /// Sent when no webhook is configured
    pub greeting_reply: String,
    /// Sent when the webhook answered with a shape we could not read
    pub default_reply: String,
    /// Sent when the webhook call failed in any way
    pub fallback_reply: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_host: "0.0.0.0".to_string(),
            app_port: 8080,
            webhook_url: None,
            allowed_origins: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            upstream_timeout: Duration::from_millis(8_000),
            reply_fields: DEFAULT_REPLY_FIELDS.iter().map(|f| f.to_string()).collect(),
            nested_reply_key: "body".to_string(),
            greeting_reply: "Hi! How can I help you today?".to_string(),
            default_reply: "I'm here to help! What would you like to know?".to_string(),
            fallback_reply: "Hi there! Thanks for reaching out. How can I help you today?"
                .to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {value}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("General error: {0}")]
    Other(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env if present
        let _ = dotenv();

        let defaults = Config::default();

        let app_host = env_or("APP_HOST", defaults.app_host);
        let app_port = parse_or_default::<u16>("APP_PORT", defaults.app_port)?;

        let webhook_url = parse_url_optional("RELAY_WEBHOOK_URL")?;

        let allowed_origins = match env::var("RELAY_ALLOWED_ORIGINS") {
            Ok(raw) => split_list(&raw),
            Err(_) => defaults.allowed_origins,
        };

        let timeout_ms = parse_or_default::<u64>("RELAY_TIMEOUT_MS", 8_000)?;
        if timeout_ms == 0 {
            return Err(ConfigError::Other(
                "RELAY_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }

        let reply_fields = match env::var("RELAY_REPLY_FIELDS") {
            Ok(raw) => split_list(&raw),
            Err(_) => defaults.reply_fields,
        };
        if reply_fields.is_empty() {
            return Err(ConfigError::Other(
                "RELAY_REPLY_FIELDS must name at least one field".to_string(),
            ));
        }
        let nested_reply_key = env_or("RELAY_NESTED_KEY", defaults.nested_reply_key);

        Ok(Self {
            app_host,
            app_port,
            webhook_url,
            allowed_origins,
            upstream_timeout: Duration::from_millis(timeout_ms),
            reply_fields,
            nested_reply_key,
            greeting_reply: env_or("RELAY_GREETING", defaults.greeting_reply),
            default_reply: env_or("RELAY_DEFAULT_REPLY", defaults.default_reply),
            fallback_reply: env_or("RELAY_FALLBACK_REPLY", defaults.fallback_reply),
        })
    }
}

/* --------------------------- helpers --------------------------- */

fn env_or(key: &'static str, default: String) -> String {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

fn parse_or_default<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(v) => v.trim().parse::<T>().map_err(|_| ConfigError::InvalidNumber {
            name: key,
            value: v,
        }),
        Err(_) => Ok(default),
    }
}

fn parse_url_optional(key: &'static str) -> Result<Option<Url>, ConfigError> {
    let raw = match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => return Ok(None),
    };
    Url::parse(raw.trim())
        .map(Some)
        .map_err(|_| ConfigError::InvalidUrl {
            name: key,
            value: raw,
        })
}

/// Comma-separated list, entries trimmed, empties dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
