//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use betdash_config::ConfigError;
use betdash_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the dashboard at {url}")]
    #[diagnostic(
        code(betdash::connection_failed),
        help(
            "Check that the dashboard backend is running and reachable.\n\
             Try: betdash health --dashboard http://localhost:8000"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(code(betdash::timeout), help("Raise the limit with --timeout <SECONDS>."))]
    Timeout,

    // ── Routing / API ────────────────────────────────────────────────
    #[error("No dashboard route matches '{path}'")]
    #[diagnostic(code(betdash::route_not_found), help("Run: betdash routes"))]
    RouteNotFound { path: String },

    #[error("Dashboard API error: {message}")]
    #[diagnostic(code(betdash::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No dashboard configured")]
    #[diagnostic(
        code(betdash::no_config),
        help(
            "Pass --dashboard <URL>, set BETDASH_DASHBOARD, or create a profile with:\n\
             betdash config init\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found")]
    #[diagnostic(code(betdash::profile_not_found), help("Available profiles: {available}"))]
    ProfileNotFound { name: String, available: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(betdash::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(betdash::config))]
    Config(ConfigError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(betdash::validation))]
    Validation { field: String, reason: String },

    // ── Plumbing ─────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    #[diagnostic(code(betdash::io))]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(betdash::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::RouteNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::ApiError {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoConfig { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RouteNotFound { path } => CliError::RouteNotFound { path },

            CoreError::ViewLoad { view, reason } => CliError::ApiError {
                message: format!("view '{view}' failed to load: {reason}"),
                status: None,
            },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Config { message } => CliError::Validation {
                field: "dashboard".into(),
                reason: message,
            },
        }
    }
}
