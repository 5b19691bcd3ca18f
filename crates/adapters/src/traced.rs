// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced journal wrapper for consistent observability

use crate::journal::{ChangeJournal, JournalError, ReadRequest};
use async_trait::async_trait;
use jw_core::JournalData;

/// Wrapper that adds tracing to any ChangeJournal
#[derive(Clone)]
pub struct TracedJournal<J> {
    volume: String,
    inner: J,
}

impl<J> TracedJournal<J> {
    pub fn new(volume: impl Into<String>, inner: J) -> Self {
        Self {
            volume: volume.into(),
            inner,
        }
    }
}

#[async_trait]
impl<J: ChangeJournal> ChangeJournal for TracedJournal<J> {
    async fn query(&self) -> Result<JournalData, JournalError> {
        let span = tracing::info_span!("journal.query", volume = %self.volume);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.query().await;
        let elapsed = start.elapsed();

        match &result {
            Ok(data) => tracing::debug!(
                journal_id = %data.journal_id,
                first_usn = %data.first_usn,
                next_usn = %data.next_usn,
                elapsed_ms = elapsed.as_millis() as u64,
                "queried"
            ),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "query failed"
            ),
        }

        result
    }

    async fn read(&self, request: &ReadRequest, buf: &mut [u8]) -> Result<usize, JournalError> {
        let span = tracing::debug_span!(
            "journal.read",
            volume = %self.volume,
            start_usn = %request.start_usn
        );
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.read(request, buf).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(len) => tracing::trace!(
                bytes = *len,
                elapsed_ms = elapsed.as_millis() as u64,
                "read"
            ),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "read failed"
            ),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
