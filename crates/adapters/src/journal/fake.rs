// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake change journal for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChangeJournal, JournalError, ReadRequest};
use async_trait::async_trait;
use jw_core::JournalData;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded journal call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalCall {
    Query,
    Read(ReadRequest),
}

#[derive(Default)]
struct FakeState {
    identity: Option<JournalData>,
    queries: VecDeque<Result<JournalData, JournalError>>,
    reads: VecDeque<Result<Vec<u8>, JournalError>>,
    calls: Vec<JournalCall>,
}

/// Scripted change journal.
///
/// Queries pop scripted results, then fall back to the current identity.
/// Reads pop scripted batches or errors; once the script runs dry every read
/// returns a cursor-only batch echoing the requested start cursor.
#[derive(Clone, Default)]
pub struct FakeJournal {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeJournal {
    pub fn new(identity: JournalData) -> Self {
        let journal = Self::default();
        journal.set_identity(identity);
        journal
    }

    /// Identity reported once scripted queries are used up
    pub fn set_identity(&self, identity: JournalData) {
        self.state().identity = Some(identity);
    }

    pub fn push_query(&self, result: Result<JournalData, JournalError>) {
        self.state().queries.push_back(result);
    }

    /// Script a raw batch, cursor prefix included.
    ///
    /// The full length is reported even if it exceeds the caller's buffer.
    pub fn push_batch(&self, bytes: Vec<u8>) {
        self.state().reads.push_back(Ok(bytes));
    }

    pub fn push_read_error(&self, err: JournalError) {
        self.state().reads.push_back(Err(err));
    }

    /// Scripted reads not yet consumed
    pub fn pending_reads(&self) -> usize {
        self.state().reads.len()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<JournalCall> {
        self.state().calls.clone()
    }

    /// Requests of every read, in order
    pub fn reads(&self) -> Vec<ReadRequest> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                JournalCall::Read(request) => Some(*request),
                JournalCall::Query => None,
            })
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, JournalCall::Query))
            .count()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ChangeJournal for FakeJournal {
    async fn query(&self) -> Result<JournalData, JournalError> {
        let mut state = self.state();
        state.calls.push(JournalCall::Query);

        if let Some(result) = state.queries.pop_front() {
            if let Ok(data) = &result {
                state.identity = Some(data.clone());
            }
            return result;
        }
        state
            .identity
            .clone()
            .ok_or_else(|| JournalError::Unavailable("no journal on fake volume".to_string()))
    }

    async fn read(&self, request: &ReadRequest, buf: &mut [u8]) -> Result<usize, JournalError> {
        let mut state = self.state();
        state.calls.push(JournalCall::Read(*request));

        let bytes = match state.reads.pop_front() {
            Some(Ok(bytes)) => bytes,
            Some(Err(err)) => return Err(err),
            None => request.start_usn.0.to_le_bytes().to_vec(),
        };

        let copied = bytes.len().min(buf.len());
        buf[..copied].copy_from_slice(&bytes[..copied]);
        Ok(bytes.len())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
