// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal identity and cursor types
//!
//! A journal is identified by an opaque 64-bit id that changes whenever the
//! journal is deleted and recreated. Positions within it are update sequence
//! numbers (USNs), which only ever grow.

use crate::config::StartAt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Update sequence number: a monotonically increasing journal cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usn(pub i64);

impl std::fmt::Display for Usn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque journal identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JournalId(pub u64);

impl std::fmt::Display for JournalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// Result of an identity query against the facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalData {
    pub journal_id: JournalId,
    pub first_usn: Usn,
    pub next_usn: Usn,
    pub lowest_valid_usn: Usn,
    pub max_usn: Usn,
    pub maximum_size: u64,
    pub allocation_delta: u64,
}

impl JournalData {
    /// Identity with only the fields the session protocol needs
    pub fn new(journal_id: JournalId, first_usn: Usn, next_usn: Usn) -> Self {
        Self {
            journal_id,
            first_usn,
            next_usn,
            lowest_valid_usn: first_usn,
            max_usn: Usn(i64::MAX),
            maximum_size: 0,
            allocation_delta: 0,
        }
    }
}

impl std::fmt::Display for JournalData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Journal ID:       {}", self.journal_id)?;
        writeln!(f, "First USN:        {}", self.first_usn)?;
        writeln!(f, "Next USN:         {}", self.next_usn)?;
        writeln!(f, "Lowest valid USN: {}", self.lowest_valid_usn)?;
        writeln!(f, "Max USN:          {}", self.max_usn)?;
        writeln!(f, "Maximum size:     {} bytes", self.maximum_size)?;
        write!(f, "Allocation delta: {} bytes", self.allocation_delta)
    }
}

/// Identity reported by the facility violates the cursor ordering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("journal {journal_id} reports next USN {next_usn} before first USN {first_usn}")]
pub struct SessionInvariantError {
    pub journal_id: JournalId,
    pub first_usn: Usn,
    pub next_usn: Usn,
}

/// Identity snapshot every read is issued against.
///
/// Never patched: when the journal is invalidated a new session replaces the
/// old one wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalSession {
    journal_id: JournalId,
    first_usn: Usn,
    next_usn: Usn,
}

impl JournalSession {
    pub fn from_data(data: &JournalData) -> Result<Self, SessionInvariantError> {
        if data.next_usn < data.first_usn {
            return Err(SessionInvariantError {
                journal_id: data.journal_id,
                first_usn: data.first_usn,
                next_usn: data.next_usn,
            });
        }
        Ok(Self {
            journal_id: data.journal_id,
            first_usn: data.first_usn,
            next_usn: data.next_usn,
        })
    }

    pub fn journal_id(&self) -> JournalId {
        self.journal_id
    }

    pub fn first_usn(&self) -> Usn {
        self.first_usn
    }

    pub fn next_usn(&self) -> Usn {
        self.next_usn
    }

    /// Cursor the first read of this session starts from
    pub fn start_usn(&self, start: StartAt) -> Usn {
        match start {
            StartAt::Next => self.next_usn,
            StartAt::First => self.first_usn,
        }
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
