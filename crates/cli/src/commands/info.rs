// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Info command: print a volume's journal identity

use crate::error::JwError;
use crate::output::{render, OutputFormat};
use anyhow::Result;
use jw_adapters::{open_volume, ChangeJournal, TracedJournal};

#[derive(clap::Args)]
pub struct InfoArgs {
    /// Volume to query, e.g. C:
    volume: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

pub async fn handle(args: InfoArgs) -> Result<()> {
    let journal = open_volume(&args.volume).map_err(|e| JwError::open_failed(&args.volume, e))?;
    let journal = TracedJournal::new(&args.volume, journal);

    let data = journal
        .query()
        .await
        .map_err(|e| JwError::journal_unavailable(&args.volume, &e.to_string()))?;

    println!("{}", render(&data, args.format)?);
    Ok(())
}
