// ── Core error types ──
//
// User-facing errors from betdash-core. Consumers never see HTTP bodies or
// socket errors directly; the `From<betdash_api::Error>` impl translates
// wire-level failures into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Routing ──────────────────────────────────────────────────────
    #[error("No route matches '{path}'")]
    RouteNotFound { path: String },

    #[error("Failed to load view '{view}': {reason}")]
    ViewLoad { view: String, reason: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach dashboard at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Dashboard request timed out")]
    Timeout,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from wire-level errors ───────────────────────────────

impl From<betdash_api::Error> for CoreError {
    fn from(err: betdash_api::Error) -> Self {
        match err {
            betdash_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            betdash_api::Error::UnsupportedScheme { scheme } => CoreError::Config {
                message: format!("Unsupported dashboard scheme '{scheme}'"),
            },
            betdash_api::Error::MissingHost { url } => CoreError::Config {
                message: format!("Dashboard URL has no host: {url}"),
            },
            betdash_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            betdash_api::Error::Status { status, url, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status} from {url}")
                } else {
                    format!("HTTP {status} from {url}: {body}")
                },
                status: Some(status),
            },
            betdash_api::Error::WebSocketConnect(reason) | betdash_api::Error::WebSocketRead(reason) => {
                CoreError::ConnectionFailed {
                    url: String::new(),
                    reason,
                }
            }
            betdash_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response body: {message}"),
                status: None,
            },
        }
    }
}
