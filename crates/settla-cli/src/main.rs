//! Settla CLI - settlement simulation and configuration.

mod commands;
mod config;
mod output;
mod simulate;
mod telemetry;

use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = commands::Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: commands::Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    config.validate()?;
    telemetry::init_telemetry(&config.log_level, config.json_logs)?;

    tracing::debug!(?config, "Configuration loaded");
    commands::execute(cli.command, config)
}
