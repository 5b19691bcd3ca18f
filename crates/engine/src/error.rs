// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the monitor

use crate::session::SessionError;
use crate::sink::SinkError;
use thiserror::Error;

/// Conditions that stop a monitor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// The first identity query failed
    #[error(transparent)]
    Unavailable(#[from] SessionError),
    #[error("{what} failed {failures} consecutive times, giving up")]
    RetriesExhausted { what: &'static str, failures: u32 },
    #[error(transparent)]
    SinkClosed(#[from] SinkError),
}
