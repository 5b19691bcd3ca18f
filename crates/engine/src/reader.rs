// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One bounded journal read per poll iteration

use jw_adapters::{ChangeJournal, JournalError, ReadRequest};
use jw_core::{BatchDecoder, JournalSession, ReasonMask, Usn, VersionWindow, CURSOR_LEN};
use thiserror::Error;

/// Why a read produced no batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The session's journal id or cursor is no longer valid
    #[error("journal invalidated: {0}")]
    Invalidated(String),
    /// Retry the same cursor after a delay
    #[error("transient read failure: {0}")]
    Transient(String),
    /// Nothing past the cursor yet
    #[error("no new changes")]
    Empty,
}

/// Records of one read plus the cursor for the next one
#[derive(Debug, Clone)]
pub struct ChangeBatch<'a> {
    records: BatchDecoder<'a>,
}

impl<'a> ChangeBatch<'a> {
    pub fn next_usn(&self) -> Usn {
        self.records.next_usn()
    }

    /// Records in cursor order, decoded as they are pulled
    pub fn into_records(self) -> BatchDecoder<'a> {
        self.records
    }
}

/// Issues reads into a reusable arena sized once at construction
#[derive(Debug)]
pub struct BatchReader {
    arena: Vec<u8>,
    versions: VersionWindow,
    return_only_on_close: bool,
}

impl BatchReader {
    pub fn new(max_batch_bytes: usize, versions: VersionWindow, return_only_on_close: bool) -> Self {
        Self {
            arena: vec![0; max_batch_bytes.max(CURSOR_LEN)],
            versions,
            return_only_on_close,
        }
    }

    pub fn capacity(&self) -> usize {
        self.arena.len()
    }

    /// Request for reading `session` from `cursor`
    pub fn request(&self, session: &JournalSession, cursor: Usn) -> ReadRequest {
        ReadRequest {
            journal_id: session.journal_id(),
            start_usn: cursor,
            reason_mask: ReasonMask::CHANGE_FILTER,
            versions: self.versions,
            return_only_on_close: self.return_only_on_close,
        }
    }

    /// Read the batch that starts at `cursor`
    pub async fn read_next<J: ChangeJournal>(
        &mut self,
        journal: &J,
        session: &JournalSession,
        cursor: Usn,
    ) -> Result<ChangeBatch<'_>, ReadError> {
        let request = self.request(session, cursor);
        let reported = journal
            .read(&request, &mut self.arena)
            .await
            .map_err(|e| match e {
                JournalError::Invalidated(msg) | JournalError::Unavailable(msg) => {
                    ReadError::Invalidated(msg)
                }
                JournalError::Transient(msg) => ReadError::Transient(msg),
            })?;

        let capacity = self.capacity();
        let len = if reported > capacity {
            tracing::warn!(
                reported,
                capacity,
                "journal reported more bytes than the read buffer holds, clamping"
            );
            capacity
        } else {
            reported
        };
        if len <= CURSOR_LEN {
            return Err(ReadError::Empty);
        }

        let records =
            BatchDecoder::new(&self.arena[..len], self.versions).ok_or(ReadError::Empty)?;
        let next_usn = records.next_usn();
        if next_usn < cursor {
            tracing::warn!(%cursor, %next_usn, "journal returned a cursor behind the request");
        }

        Ok(ChangeBatch { records })
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
