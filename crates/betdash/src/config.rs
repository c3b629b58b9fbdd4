//! Resolves the dashboard to talk to from `--dashboard`, the active profile
//! and the global flag overrides.

use std::time::Duration;

use betdash_config::{
    Config, active_profile_name, config_path, load_config, parse_dashboard_url,
    profile_to_dashboard_config,
};
use betdash_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `DashboardConfig` from the config file, profile, and CLI overrides.
pub fn build_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config()?;
    dashboard_config_from(&cfg, global)
}

fn dashboard_config_from(cfg: &Config, global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    // An explicit URL bypasses profiles entirely.
    if let Some(raw) = global.dashboard.as_deref() {
        let mut dashboard = DashboardConfig::new(parse_dashboard_url(raw)?);
        dashboard.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
        dashboard.insecure = global.insecure || cfg.defaults.insecure;
        return Ok(dashboard);
    }

    let profile_name = active_profile_name(global.profile.as_deref(), cfg);
    let Some(profile) = cfg.profiles.get(&profile_name) else {
        if global.profile.is_some() {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    let mut dashboard = profile_to_dashboard_config(profile, &cfg.defaults)?;
    if let Some(secs) = global.timeout {
        dashboard.timeout = Duration::from_secs(secs);
    }
    dashboard.insecure |= global.insecure;
    tracing::debug!(profile = %profile_name, url = %dashboard.url, "Using profile");
    Ok(dashboard)
}
