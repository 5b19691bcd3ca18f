// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change-journal facility adapters

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsJournal as VolumeJournal;

#[cfg(not(windows))]
mod unsupported;
#[cfg(not(windows))]
pub use unsupported::UnsupportedJournal as VolumeJournal;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeJournal, JournalCall};

use async_trait::async_trait;
use jw_core::{JournalData, JournalId, ReasonMask, Usn, VersionWindow};
use thiserror::Error;

/// Errors from journal calls on an open volume
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    /// No journal is active on the volume, or it cannot be queried
    #[error("journal unavailable: {0}")]
    Unavailable(String),
    /// The held journal id or cursor is no longer valid
    #[error("journal invalidated: {0}")]
    Invalidated(String),
    /// Anything else; the same read may succeed later
    #[error("journal read failed: {0}")]
    Transient(String),
}

/// Errors from opening a volume
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("volume not found: {0}")]
    NotFound(String),
    #[error("access denied opening volume {0}")]
    AccessDenied(String),
    #[error("change journals are not supported on this platform")]
    Unsupported,
    #[error("failed to open volume {volume}: {source}")]
    Other {
        volume: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parameters for a single batch read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    pub journal_id: JournalId,
    pub start_usn: Usn,
    pub reason_mask: ReasonMask,
    pub versions: VersionWindow,
    pub return_only_on_close: bool,
}

/// A volume's change journal.
///
/// Both calls return without waiting for new changes; the caller owns the
/// wait discipline.
#[async_trait]
pub trait ChangeJournal: Send + Sync + 'static {
    /// Query the journal identity and cursor bounds
    async fn query(&self) -> Result<JournalData, JournalError>;

    /// Fill `buf` with the next batch starting at `request.start_usn`.
    ///
    /// Returns the number of bytes written. The first 8 bytes hold the
    /// cursor for the following read.
    async fn read(&self, request: &ReadRequest, buf: &mut [u8]) -> Result<usize, JournalError>;
}

#[async_trait]
impl<J: ChangeJournal + ?Sized> ChangeJournal for Box<J> {
    async fn query(&self) -> Result<JournalData, JournalError> {
        (**self).query().await
    }

    async fn read(&self, request: &ReadRequest, buf: &mut [u8]) -> Result<usize, JournalError> {
        (**self).read(request, buf).await
    }
}

/// Open the change journal of `volume` (`C:`, `C`, `C:\` or `\\.\C:`)
pub fn open_volume(volume: &str) -> Result<VolumeJournal, OpenError> {
    VolumeJournal::open(volume)
}

/// Device path for a volume designator
pub fn device_path(volume: &str) -> String {
    let trimmed = volume.trim();
    if trimmed.starts_with(r"\\.\") || trimmed.starts_with(r"\\?\") {
        return trimmed.trim_end_matches('\\').to_string();
    }
    let bare = trimmed.trim_end_matches(['\\', '/']).trim_end_matches(':');
    format!(r"\\.\{}:", bare.to_ascii_uppercase())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
