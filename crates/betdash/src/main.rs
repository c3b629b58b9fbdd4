mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so they never mix with streamed output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    match cli.command {
        // No dashboard needed
        Command::Config(args) => commands::config_cmd::handle(args, global),
        Command::Routes => commands::routes::handle(global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "betdash", &mut std::io::stdout());
            Ok(())
        }

        // Resolves its route before touching config
        Command::View(args) => commands::view::handle(args, global).await,

        Command::Health => {
            let dashboard = config::build_dashboard_config(global)?;
            commands::health::handle(&dashboard, global).await
        }
        Command::Logs(args) => {
            let dashboard = config::build_dashboard_config(global)?;
            tracing::debug!(url = %dashboard.url, "Following live logs");
            commands::logs::handle(&dashboard, args, global).await
        }
    }
}
