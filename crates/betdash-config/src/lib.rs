//! Shared configuration for the betdash CLI.
//!
//! TOML profiles layered with `BETDASH_*` environment variables, and
//! translation to `betdash_core::DashboardConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use betdash_core::{DEFAULT_DASHBOARD_URL, DEFAULT_TIMEOUT_SECS, DashboardConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not defined")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named dashboard profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// A named dashboard profile.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    /// Dashboard base URL (e.g., "http://localhost:8000").
    pub dashboard: String,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(dashboard: impl Into<String>) -> Self {
        Self {
            dashboard: dashboard.into(),
            insecure: None,
            timeout: None,
        }
    }
}

/// Config written by `betdash config init`.
pub fn starter_config() -> Config {
    let mut cfg = Config::default();
    cfg.profiles
        .insert("default".into(), Profile::new(DEFAULT_DASHBOARD_URL));
    cfg
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "betdash", "betdash").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("betdash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file + environment. A missing file is not an error.
///
/// Nested keys use a double underscore: `BETDASH_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BETDASH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_config(cfg)?)?;
    Ok(())
}

/// The TOML text `save_config` would write.
pub fn render_config(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Profile resolution ──────────────────────────────────────────────

/// Name of the profile to use: explicit choice, then `default_profile`,
/// then `"default"`.
pub fn active_profile_name(explicit: Option<&str>, cfg: &Config) -> String {
    explicit
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `DashboardConfig` from a profile, falling back to global defaults.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let url = parse_dashboard_url(&profile.dashboard)?;

    Ok(DashboardConfig {
        url,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        insecure: profile.insecure.unwrap_or(defaults.insecure),
    })
}

/// Resolve the named profile to a `DashboardConfig`.
pub fn resolve_profile(cfg: &Config, profile_name: &str) -> Result<DashboardConfig, ConfigError> {
    let profile = cfg
        .profiles
        .get(profile_name)
        .ok_or_else(|| ConfigError::UnknownProfile {
            profile: profile_name.into(),
        })?;
    profile_to_dashboard_config(profile, &cfg.defaults)
}

/// Parse and validate a dashboard URL (web or socket scheme, with a host).
pub fn parse_dashboard_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "dashboard".into(),
        reason: format!("invalid URL: {raw}"),
    })?;

    if !matches!(url.scheme(), "http" | "https" | "ws" | "wss") {
        return Err(ConfigError::Validation {
            field: "dashboard".into(),
            reason: format!("expected an http(s) URL, got '{}'", url.scheme()),
        });
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Validation {
            field: "dashboard".into(),
            reason: format!("URL has no host: {raw}"),
        });
    }
    Ok(url)
}

// ── Tests ───────────────────────────────────────────────────────────
