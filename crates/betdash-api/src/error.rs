use thiserror::Error;

/// Top-level error type for the `betdash-api` crate.
///
/// Covers the REST surface and the live-log socket. `betdash-core` maps
/// these into user-facing variants.
#[derive(Debug, Error)]
pub enum Error {
    // ── Endpoint ────────────────────────────────────────────────────
    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The dashboard URL uses a scheme with no socket counterpart.
    #[error("Unsupported scheme '{scheme}' (expected http, https, ws or wss)")]
    UnsupportedScheme { scheme: String },

    /// The dashboard URL has no host component.
    #[error("Dashboard URL has no host: {url}")]
    MissingHost { url: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status from the dashboard backend.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String, body: String },

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket handshake failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// The socket broke after it was established.
    #[error("WebSocket read failed: {0}")]
    WebSocketRead(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
