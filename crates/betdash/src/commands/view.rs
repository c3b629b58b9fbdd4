//! `betdash view <path>`: resolve a dashboard path and print what the view
//! would show.

use owo_colors::OwoColorize;
use serde::Serialize;

use betdash_core::{BuiltinViews, CoreError, DashboardConfig, RouteTable, Router, ViewSpec};

use crate::cli::{GlobalOpts, OutputFormat, ViewArgs};
use crate::config::build_dashboard_config;
use crate::error::CliError;
use crate::output;

/// Local state shown by the settings view.
#[derive(Debug, Serialize)]
struct SettingsSummary {
    dashboard: String,
    live_logs: String,
    timeout_secs: u64,
    insecure: bool,
    config_file: String,
}

impl SettingsSummary {
    fn new(dashboard: &DashboardConfig) -> Result<Self, CliError> {
        let live_logs = dashboard
            .page_location()?
            .log_stream_url()
            .map_err(CoreError::from)?;
        Ok(Self {
            dashboard: dashboard.url.to_string(),
            live_logs: live_logs.to_string(),
            timeout_secs: dashboard.timeout.as_secs(),
            insecure: dashboard.insecure,
            config_file: betdash_config::config_path().display().to_string(),
        })
    }

    fn detail(&self) -> String {
        format!(
            "dashboard:   {}\nlive logs:   {}\ntimeout:     {}s\ninsecure:    {}\nconfig file: {}",
            self.dashboard, self.live_logs, self.timeout_secs, self.insecure, self.config_file
        )
    }
}

pub async fn handle(args: ViewArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Route first: an unknown path fails before any config is needed.
    let mut router = Router::new(RouteTable::dashboard(), BuiltinViews);
    let resolved = router.resolve(&args.path).await?;
    tracing::debug!(route = %resolved.route, "Resolved view");

    let dashboard = build_dashboard_config(global)?;
    let body = render_view(&resolved.view, &dashboard, global).await?;

    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        let heading = resolved.view.title;
        if output::should_color(&global.color) {
            println!("{}", heading.bold());
        } else {
            println!("{heading}");
        }
    }
    output::print_output(&body, global.quiet);
    Ok(())
}

async fn render_view(
    view: &ViewSpec,
    dashboard: &DashboardConfig,
    global: &GlobalOpts,
) -> Result<String, CliError> {
    match view.data_endpoint {
        Some(endpoint) => {
            let client = super::rest_client(dashboard)?;
            let data = client.get_json(endpoint).await.map_err(CoreError::from)?;
            output::render_value(&global.output, &data)
        }
        None => {
            let summary = SettingsSummary::new(dashboard)?;
            output::render_single(&global.output, &summary, SettingsSummary::detail, |s| {
                s.dashboard.clone()
            })
        }
    }
}
