//! CLI entry point.
//!
//! Parses arguments, sets up logging and dispatches to handlers. Commands
//! that speak go through `bootstrap`; `split` only needs settings.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use readaloud_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers, load_settings};

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Split { text, max, long } => {
            let settings = load_settings(cli.settings.as_deref())?;
            handlers::split::execute(&text, max, long, &settings);
        }
        Commands::Speak(args) => {
            let ctx = bootstrap(&CliConfig {
                settings_path: cli.settings,
                engine: args.engine,
            })?;
            handlers::speak::execute(&ctx, args).await?;
        }
        Commands::Voices { engine, json } => {
            let ctx = bootstrap(&CliConfig {
                settings_path: cli.settings,
                engine,
            })?;
            handlers::voices::execute(&ctx, json).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
