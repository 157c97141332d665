// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Punchsync - bridges a biometric time clock to an HR payroll API.
//!
//! This is the binary entry point: CLI parsing, logging setup, and the
//! dispatch into the serve loop and the one-shot commands.

use clap::{Parser, Subcommand};
use punchsync_config::PunchsyncConfig;
use punchsync_storage::Database;
use tracing_subscriber::EnvFilter;

mod config_cmd;
mod serve;
mod status;

/// Punchsync - attendance bridge between a time-clock device and payroll.
#[derive(Parser, Debug)]
#[command(name = "punchsync", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the background upload trigger until interrupted.
    Serve,
    /// Run a single upload/reconciliation cycle and exit.
    Upload,
    /// Show store counters and recent upload attempts.
    Status {
        /// Number of audit entries to show.
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Inspect or update the sync configuration row.
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match punchsync_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            punchsync_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run(&config).await,
        Some(Commands::Upload) => run_upload_once(&config).await,
        Some(Commands::Status { limit }) => status::run(&config, limit).await,
        Some(Commands::Config { command }) => config_cmd::run(&config, command).await,
        None => {
            println!("punchsync: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("punchsync: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &PunchsyncConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.service.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Open the configured database, creating it on first run.
async fn open_database(
    config: &PunchsyncConfig,
) -> Result<Database, punchsync_core::PunchsyncError> {
    Database::open(&config.storage.database_path).await
}

async fn run_upload_once(config: &PunchsyncConfig) -> Result<(), punchsync_core::PunchsyncError> {
    let db = open_database(config).await?;
    let mut uploader = serve::build_uploader(db.clone(), config);
    uploader.upload_data().await;
    db.close().await
}
