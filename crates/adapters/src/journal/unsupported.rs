// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stand-in for platforms without a change journal

use super::{ChangeJournal, JournalError, OpenError, ReadRequest};
use async_trait::async_trait;
use jw_core::JournalData;

/// Never constructed: opening always fails with [`OpenError::Unsupported`]
#[derive(Debug)]
pub enum UnsupportedJournal {}

impl UnsupportedJournal {
    pub fn open(_volume: &str) -> Result<Self, OpenError> {
        Err(OpenError::Unsupported)
    }
}

#[async_trait]
impl ChangeJournal for UnsupportedJournal {
    async fn query(&self) -> Result<JournalData, JournalError> {
        match *self {}
    }

    async fn read(&self, _request: &ReadRequest, _buf: &mut [u8]) -> Result<usize, JournalError> {
        match *self {}
    }
}
