// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change events handed to sinks

use crate::classify::{classify, ChangeKind};
use crate::journal::Usn;
use crate::reason::ReasonMask;
use crate::record::{ChangeRecord, RecordVersion};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One file-level change notification, derived 1:1 from a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub version: RecordVersion,
    pub reasons: ReasonMask,
    pub usn: Usn,
    pub parent_file_id: u64,
    pub file_id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<&ChangeRecord> for ChangeEvent {
    fn from(record: &ChangeRecord) -> Self {
        Self {
            kind: classify(record.reasons),
            version: record.version,
            reasons: record.reasons,
            usn: record.usn,
            parent_file_id: record.parent_file_id.low64(),
            file_id: record.file_id.low64(),
            name: record.name.to_string_lossy(),
            timestamp: record.timestamp,
        }
    }
}

impl std::fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] [{}][ParentFRN:{:X}] {}",
            self.kind.tag(),
            self.version,
            self.parent_file_id,
            self.name
        )
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
