mod api;
mod cli;
mod config;
mod ingest;
mod report;
mod workbook;

use anyhow::Result;
use clap::Parser;

use cli::commands::{ingest::handle_ingest_command, inspect::handle_inspect_command, report::handle_report_command};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { file } => handle_inspect_command(&file, &config),
        Commands::Ingest(command) => handle_ingest_command(command, &config).await,
        Commands::Report(command) => handle_report_command(command, &config).await,
    }
}

/// `RUST_LOG` wins; otherwise `info`, raised by each `-v`
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
