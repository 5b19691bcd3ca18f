// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jwatch - live file changes from a volume's change journal

mod commands;
mod discovery;
mod error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, info, watch};
use discovery::load_config;
use error::JwError;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "jwatch",
    version,
    about = "Stream file create/delete/rename/write events from the NTFS change journal"
)]
struct Cli {
    /// Configuration file (default: $JWATCH_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream change events until interrupted
    Watch(watch::WatchArgs),
    /// Show a volume's journal identity and cursor bounds
    Info(info::InfoArgs),
    /// Print the configuration as TOML
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<JwError>() {
                Some(err) => eprint!("{}", err),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let _guard = logging::setup_logging(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Watch(args) => {
            let (config, _) = load_config(cli.config.as_deref())?;
            watch::handle(args, config).await
        }
        Commands::Info(args) => info::handle(args).await,
        Commands::Config(args) => config::handle(args, cli.config.as_deref()),
    }
}
