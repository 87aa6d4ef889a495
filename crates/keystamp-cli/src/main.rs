mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::Config;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("keystamp=info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        match Config::load(&cli.config) {
            Ok(c) => {
                debug!("Loaded config from {:?}", cli.config);
                c
            }
            Err(e) => {
                warn!("Failed to load config: {:#}, using defaults", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    match cli.command {
        Command::Locate {
            exe,
            platform,
            json,
        } => commands::locate::run(&exe, config.platform(platform), json),
        Command::Info {
            windows,
            mac,
            output,
        } => commands::info::run(
            windows.as_deref(),
            mac.as_deref(),
            &config.offsets_file(output.as_deref()),
        ),
        Command::Patch { target } => commands::patch::run(target, &config),
        Command::Keygen { seeds, table } => commands::keygen::run(&seeds, table),
        Command::Inspect { target } => commands::inspect::run(&target, &config),
        Command::Dump {
            exe,
            offsets,
            output,
        } => commands::dump::run(
            &exe,
            &config.offsets_file(offsets.as_deref()),
            output.as_deref(),
        ),
        Command::Hexdump {
            exe,
            offset,
            size,
            ascii,
        } => commands::hexdump::run(&exe, &offset, size, ascii),
    }
}
