// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reason-mask classification
//!
//! A record may carry several co-occurring reasons (create and extend in the
//! same close, for instance). Notifications get one label, picked by a fixed
//! precedence:
//!
//! 1. `FILE_CREATE` → [`ChangeKind::Create`]
//! 2. `FILE_DELETE` → [`ChangeKind::Delete`]
//! 3. `RENAME_NEW_NAME` → [`ChangeKind::Rename`]
//! 4. `DATA_OVERWRITE` or `DATA_EXTEND` → [`ChangeKind::Write`]
//! 5. anything else → [`ChangeKind::Other`]
//!
//! Lower-ranked reasons are not lost: the full mask travels with the event.
//! A create+delete mask (a temporary file that lived and died between two
//! reads) is labelled `Create`; sinks that care must look at the mask.

use crate::reason::ReasonMask;
use serde::Serialize;

/// Coarse change label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Delete,
    Rename,
    Write,
    Other,
}

impl ChangeKind {
    /// Fixed-width tag used in console output
    pub fn tag(self) -> &'static str {
        match self {
            ChangeKind::Create => "CREATE",
            ChangeKind::Delete => "DELETE",
            ChangeKind::Rename => "RENAME",
            ChangeKind::Write => "WRITE ",
            ChangeKind::Other => "OTHER ",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag().trim_end())
    }
}

const PRECEDENCE: [(ReasonMask, ChangeKind); 4] = [
    (ReasonMask::FILE_CREATE, ChangeKind::Create),
    (ReasonMask::FILE_DELETE, ChangeKind::Delete),
    (ReasonMask::RENAME_NEW_NAME, ChangeKind::Rename),
    (
        ReasonMask(ReasonMask::DATA_OVERWRITE.0 | ReasonMask::DATA_EXTEND.0),
        ChangeKind::Write,
    ),
];

/// Pick the single label for a reason mask
pub fn classify(reasons: ReasonMask) -> ChangeKind {
    PRECEDENCE
        .iter()
        .find(|(mask, _)| reasons.intersects(*mask))
        .map(|(_, kind)| *kind)
        .unwrap_or(ChangeKind::Other)
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
