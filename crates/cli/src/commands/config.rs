// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config command: print the effective configuration as TOML

use crate::discovery::{load_config, ConfigSource};
use anyhow::Result;
use jw_core::WatchConfig;
use std::path::Path;

#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Print the built-in defaults instead of the effective configuration
    #[arg(long)]
    default: bool,
}

pub fn handle(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    let (config, source) = if args.default {
        (WatchConfig::default(), ConfigSource::Defaults)
    } else {
        load_config(explicit)?
    };

    println!("# source: {}", source);
    print!("{}", config.to_toml_string()?);
    Ok(())
}
