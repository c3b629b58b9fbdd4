//! `betdash health`: probe `GET /api/health`.

use betdash_core::{CoreError, DashboardConfig, Health};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(dashboard: &DashboardConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let client = super::rest_client(dashboard)?;
    let health = client.health().await.map_err(CoreError::from)?;
    tracing::debug!(status = %health.status, "Health probe answered");

    let out = output::render_single(&global.output, &health, detail, |h| h.status.clone())?;
    output::print_output(&out, global.quiet);

    if health.is_healthy() {
        Ok(())
    } else {
        Err(CliError::ApiError {
            message: format!("dashboard reports status '{}'", health.status),
            status: None,
        })
    }
}

fn detail(health: &Health) -> String {
    match &health.timestamp {
        Some(ts) => format!("status:    {}\ntimestamp: {ts}", health.status),
        None => format!("status:    {}", health.status),
    }
}
