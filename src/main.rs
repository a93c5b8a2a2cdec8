use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use premio::cli::Cli;
use premio::{config, dispatcher};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let mut config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    };
    if cli.offline {
        config.offline = true;
    }

    if let Err(e) = dispatcher::dispatch_command(cli.command, &config, cli.json).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
