// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use jw_core::ChangeEvent;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render a value in the specified format
pub fn render<T: Serialize + std::fmt::Display>(
    value: &T,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(value.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(value),
    }
}

#[derive(Serialize)]
struct VolumeEvent<'a> {
    volume: &'a str,
    #[serde(flatten)]
    event: &'a ChangeEvent,
}

/// One output line for an event.
///
/// Text lines are prefixed with the volume only when `show_volume` is set;
/// JSON lines always carry it.
pub fn event_line(
    volume: &str,
    event: &ChangeEvent,
    format: OutputFormat,
    show_volume: bool,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text if show_volume => Ok(format!("{} {}", volume, event)),
        OutputFormat::Text => Ok(event.to_string()),
        OutputFormat::Json => serde_json::to_string(&VolumeEvent { volume, event }),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
