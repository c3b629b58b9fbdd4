//! Command handlers: bridge CLI args to core calls and output formatting.

pub mod config_cmd;
pub mod health;
pub mod logs;
pub mod routes;
pub mod view;

use betdash_core::{CoreError, DashboardClient, DashboardConfig};

use crate::error::CliError;

/// REST client for the configured dashboard.
pub(crate) fn rest_client(dashboard: &DashboardConfig) -> Result<DashboardClient, CliError> {
    DashboardClient::new(dashboard.url.clone(), dashboard.timeout, dashboard.insecure)
        .map_err(|e| CliError::from(CoreError::from(e)))
}
