// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jw-core: Core library for the jwatch change-journal monitor
//!
//! This crate provides:
//! - Journal identity and cursor types
//! - A bounds-checked decoder for raw change batches
//! - Reason-mask classification into coarse change kinds
//! - Retry/backoff policy and watch configuration
//!
//! Nothing in here performs I/O; the facility lives in `jw-adapters` and the
//! poll loop in `jw-engine`.

pub mod classify;
pub mod config;
pub mod decode;
pub mod event;
pub mod journal;
pub mod reason;
pub mod record;
pub mod retry;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-exports
pub use classify::{classify, ChangeKind};
pub use config::{ConfigError, StartAt, WatchConfig};
pub use decode::{BatchDecoder, DecodeStats, DecodeStop, CURSOR_LEN};
pub use event::ChangeEvent;
pub use journal::{JournalData, JournalId, JournalSession, SessionInvariantError, Usn};
pub use reason::ReasonMask;
pub use record::{ChangeRecord, FileId, FileName, RecordVersion, VersionWindow, MAX_NAME_UNITS};
pub use retry::{Backoff, RetryAction, RetryPolicy};
