// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoded change records

use crate::journal::Usn;
use crate::reason::ReasonMask;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest name, in UTF-16 units, a record carries
pub const MAX_NAME_UNITS: usize = 255;

/// 100ns intervals between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_EPOCH: i64 = 116_444_736_000_000_000;
const FILETIME_TICKS_PER_SEC: i64 = 10_000_000;

/// Filesystem-assigned file identifier, stable across renames.
///
/// Newer layouts carry 128 bits; on NTFS only the low 64 bits identify the
/// file, the rest holds a volume sequence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileId(pub u128);

impl FileId {
    pub fn low64(self) -> u64 {
        self.0 as u64
    }
}

impl From<u64> for FileId {
    fn from(id: u64) -> Self {
        Self(u128::from(id))
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:X}", self.low64())
    }
}

/// Major/minor version of a record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordVersion {
    pub major: u16,
    pub minor: u16,
}

impl std::fmt::Display for RecordVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}.{}", self.major, self.minor)
    }
}

/// Inclusive range of major versions requested from the facility and
/// interpreted by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionWindow {
    pub min: u16,
    pub max: u16,
}

impl VersionWindow {
    /// Layouts the decoder knows how to walk
    pub const KNOWN: Self = Self { min: 2, max: 4 };

    pub fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub fn contains(self, major: u16) -> bool {
        self.min <= major && major <= self.max
    }

    /// Both ends fall inside `outer`
    pub fn within(self, outer: VersionWindow) -> bool {
        self.min <= self.max && outer.contains(self.min) && outer.contains(self.max)
    }
}

impl Default for VersionWindow {
    fn default() -> Self {
        Self { min: 3, max: 4 }
    }
}

impl std::fmt::Display for VersionWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// File name as stored in the record, capped at [`MAX_NAME_UNITS`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileName {
    units: Vec<u16>,
    truncated: bool,
}

impl FileName {
    pub fn from_units(units: &[u16]) -> Self {
        let truncated = units.len() > MAX_NAME_UNITS;
        let kept = &units[..units.len().min(MAX_NAME_UNITS)];
        Self {
            units: kept.to_vec(),
            truncated,
        }
    }

    pub fn units(&self) -> &[u16] {
        &self.units
    }

    pub fn len_units(&self) -> usize {
        self.units.len()
    }

    /// The on-disk name was longer than what is kept here
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Unpaired surrogates become U+FFFD
    pub fn to_string_lossy(&self) -> String {
        char::decode_utf16(self.units.iter().copied())
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// One validated record out of a change batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub version: RecordVersion,
    pub usn: Usn,
    pub timestamp: Option<DateTime<Utc>>,
    pub reasons: ReasonMask,
    pub file_id: FileId,
    pub parent_file_id: FileId,
    pub attributes: u32,
    pub name: FileName,
}

/// Convert a FILETIME tick count; zero and out-of-range values yield `None`
pub fn filetime_to_utc(ticks: i64) -> Option<DateTime<Utc>> {
    if ticks <= 0 {
        return None;
    }
    let unix = ticks.checked_sub(FILETIME_UNIX_EPOCH)?;
    let secs = unix.div_euclid(FILETIME_TICKS_PER_SEC);
    let nanos = (unix.rem_euclid(FILETIME_TICKS_PER_SEC) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
