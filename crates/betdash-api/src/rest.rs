//! REST access to the dashboard backend's `/api` router.
//!
//! Views fetch their data through [`DashboardClient::get_json`]; the payloads
//! are passed through untyped so the CLI can print whatever the backend sends.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Thin HTTP client bound to one dashboard origin.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardClient {
    /// Build a client with its own connection pool.
    pub fn new(base_url: Url, timeout: Duration, accept_invalid_certs: bool) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET {base}{path}` and parse the body as JSON.
    ///
    /// `path` is absolute (`/api/teams`); any path on the base URL is replaced.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, Error> {
        let url = self.base_url.join(path)?;
        tracing::debug!(url = %url, "GET");

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<Health, Error> {
        let value = self.get_json("/api/health").await?;
        serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: value.to_string(),
        })
    }
}
