// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use jw_adapters::OpenError;
use jw_core::ConfigError;
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct JwError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl JwError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for JwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for JwError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures a user can act on
impl JwError {
    /// Opening the volume failed
    pub fn open_failed(volume: &str, err: OpenError) -> Self {
        match err {
            OpenError::AccessDenied(_) => Self::access_denied(volume),
            OpenError::NotFound(_) => Self::new(format!("Volume '{}' not found", volume))
                .with_context("Volumes are named by drive letter, e.g. C:")
                .with_suggestion("List volumes with: fsutil fsinfo drives")
                .with_suggestion(format!("Check the spelling of '{}'", volume)),
            OpenError::Unsupported => Self::unsupported_platform(),
            OpenError::Other { .. } => {
                Self::new(format!("Failed to open volume '{}'", volume)).with_source(err)
            }
        }
    }

    pub fn access_denied(volume: &str) -> Self {
        Self::new(format!("Access denied opening volume '{}'", volume))
            .with_context("Reading a volume's change journal requires administrator rights")
            .with_suggestion("Run as administrator: open an elevated terminal and retry")
    }

    pub fn unsupported_platform() -> Self {
        Self::new("Change journals are not supported on this platform")
            .with_context("jwatch reads the NTFS/ReFS update sequence number journal")
            .with_suggestion("Run jwatch on Windows")
    }

    /// The identity query failed at startup
    pub fn journal_unavailable(volume: &str, reason: &str) -> Self {
        Self::new(format!("No change journal available on '{}'", volume))
            .with_context(reason.to_string())
            .with_suggestion(format!("Check the journal: fsutil usn queryjournal {}", volume))
            .with_suggestion(format!(
                "Create one: fsutil usn createjournal m=33554432 a=4194304 {}",
                volume
            ))
    }

    pub fn config_invalid(path: Option<&Path>, err: ConfigError) -> Self {
        let message = match path {
            Some(path) => format!("Invalid configuration in {}", path.display()),
            None => "Invalid configuration".to_string(),
        };
        Self::new(message)
            .with_context(err.to_string())
            .with_suggestion("Print the defaults: jwatch config --default")
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
