//! `betdash config`: inspect and create the configuration file.

use betdash_config::{
    config_path, load_config, parse_dashboard_url, render_config, save_config, starter_config,
};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = load_config()?;
            let out = match global.output {
                OutputFormat::Json | OutputFormat::JsonCompact => {
                    output::render_single(&global.output, &cfg, |_| String::new(), |_| String::new())?
                }
                OutputFormat::Table | OutputFormat::Plain => render_config(&cfg)?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = starter_config();
            if let Some(raw) = global.dashboard.as_deref() {
                let url = parse_dashboard_url(raw)?;
                if let Some(profile) = cfg.profiles.get_mut("default") {
                    profile.dashboard = url.to_string();
                }
            }

            let written = save_config(&cfg)?;
            tracing::info!(path = %written.display(), "Wrote config");
            output::print_output(&format!("Wrote {}", written.display()), global.quiet);
            Ok(())
        }
    }
}
