// ── Runtime dashboard configuration ──
//
// Describes *where* the dashboard lives and how to talk to it. Built by the
// config crate or the CLI and handed in; core never reads config files.

use std::time::Duration;

use betdash_api::PageLocation;
use url::Url;

use crate::error::CoreError;

/// Dashboard URL used when nothing is configured.
pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:8000";

/// Default REST timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one dashboard backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Dashboard page URL (e.g., `http://localhost:8000`).
    pub url: Url,
    /// Request timeout for REST calls.
    pub timeout: Duration,
    /// Accept self-signed TLS certificates on REST calls.
    pub insecure: bool,
}

impl DashboardConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            insecure: false,
        }
    }

    /// Where the live-log socket is derived from.
    pub fn page_location(&self) -> Result<PageLocation, CoreError> {
        Ok(PageLocation::from_url(&self.url)?)
    }
}
