// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! picreg - plugin registry maintenance tool.
//!
//! This is the binary entry point. Every command loads the registry file,
//! applies one operation, and writes the file back when it changed.

mod blacklist;
mod plugin;
mod refs;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use picreg_core::{ManifestFetcher, RegistryError};
use picreg_manifest::HttpManifestFetcher;
use picreg_registry::TomlRegistryStore;

/// Plugin registry maintenance tool.
#[derive(Parser, Debug)]
#[command(name = "picreg", version, about, long_about = None)]
struct Cli {
    /// Path to the registry file (overrides `registry.path` from config).
    #[arg(long, value_name = "PATH")]
    registry: Option<PathBuf>,

    /// Read configuration from this file instead of the standard locations.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Plugin operations.
    Plugin {
        #[command(subcommand)]
        action: plugin::PluginCommand,
    },
    /// Plugin ref operations.
    Ref {
        #[command(subcommand)]
        action: refs::RefCommand,
    },
    /// Blacklist operations.
    Blacklist {
        #[command(subcommand)]
        action: blacklist::BlacklistCommand,
    },
    /// Check the registry for consistency problems.
    Validate,
    /// Show registry statistics.
    Stats,
    /// Print the registry in the given format.
    Output {
        #[arg(long, value_enum, default_value_t = report::OutputFormat::Toml)]
        format: report::OutputFormat,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match picreg_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            picreg_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level, cli.verbose);

    let registry_path = cli
        .registry
        .unwrap_or_else(|| PathBuf::from(&config.registry.path));
    let store = TomlRegistryStore::new(registry_path);

    let fetcher = match HttpManifestFetcher::from_config(&config.fetch) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &store, &fetcher).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatches one command against the registry behind `store`.
async fn run(
    command: Commands,
    store: &TomlRegistryStore,
    fetcher: &dyn ManifestFetcher,
) -> Result<ExitCode, RegistryError> {
    match command {
        Commands::Plugin { action } => plugin::run(action, store, fetcher).await?,
        Commands::Ref { action } => refs::run(action, store)?,
        Commands::Blacklist { action } => blacklist::run(action, store)?,
        Commands::Validate => return report::validate(store),
        Commands::Stats => report::stats(store)?,
        Commands::Output { format } => report::output(store, format)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the config level.
fn init_tracing(log_level: &str, verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("picreg={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
