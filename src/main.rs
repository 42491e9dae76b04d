mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use gitstate::config::{self, GitstateConfig};
use gitstate::git::exit_code;
use gitstate::styling::{ERROR, ERROR_EMOJI, eprintln};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(path) = cli.config.clone() {
        config::set_config_path(path);
    }

    if let Err(e) = run(cli) {
        eprintln!("{ERROR_EMOJI} {ERROR}{e:#}{ERROR:#}");
        std::process::exit(exit_code(&e).unwrap_or(1));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GitstateConfig::load().context("Failed to load config")?;

    match cli.command {
        Commands::Status { path, format } => {
            commands::status::handle_status(&path, format, &config)
        }
    }
}

/// `RUST_LOG` overrides the level picked by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
