// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoder for raw change batches
//!
//! A batch is the outgoing cursor (8 bytes) followed by contiguous
//! variable-length records. Every record starts with a common header:
//!
//! ```text
//! +0  u32 record length (includes padding to the next record)
//! +4  u16 major version
//! +6  u16 minor version
//! ```
//!
//! The decoder never reads outside the batch it was given. A bad record
//! length ends the batch; a bad name inside an otherwise well-framed record
//! skips just that record. Decoding itself never fails.

use crate::journal::Usn;
use crate::reason::ReasonMask;
use crate::record::{
    filetime_to_utc, ChangeRecord, FileId, FileName, RecordVersion, VersionWindow,
    MAX_NAME_UNITS,
};
use thiserror::Error;

/// Width of the leading cursor
pub const CURSOR_LEN: usize = 8;

/// Length + major + minor
pub const COMMON_HEADER_LEN: usize = 8;

/// Field offsets of a layout that carries a file name
#[derive(Debug, Clone, Copy)]
struct NamedLayout {
    fixed_len: usize,
    wide_ids: bool,
    file_id_at: usize,
    parent_id_at: usize,
    usn_at: usize,
    timestamp_at: usize,
    reason_at: usize,
    attributes_at: usize,
    name_len_at: usize,
    name_offset_at: usize,
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    Named(NamedLayout),
    /// Range-tracking extents; no name, nothing to emit
    NameLess,
}

const V2: NamedLayout = NamedLayout {
    fixed_len: 60,
    wide_ids: false,
    file_id_at: 8,
    parent_id_at: 16,
    usn_at: 24,
    timestamp_at: 32,
    reason_at: 40,
    attributes_at: 52,
    name_len_at: 56,
    name_offset_at: 58,
};

const V3: NamedLayout = NamedLayout {
    fixed_len: 76,
    wide_ids: true,
    file_id_at: 8,
    parent_id_at: 24,
    usn_at: 40,
    timestamp_at: 48,
    reason_at: 56,
    attributes_at: 68,
    name_len_at: 72,
    name_offset_at: 74,
};

fn layout(major: u16) -> Option<Layout> {
    match major {
        2 => Some(Layout::Named(V2)),
        3 => Some(Layout::Named(V3)),
        4 => Some(Layout::NameLess),
        _ => None,
    }
}

/// Why a well-framed record was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("record length {declared} is shorter than the {fixed}-byte fixed part")]
    TooShort { declared: usize, fixed: usize },
    #[error("record has an empty name")]
    EmptyName,
    #[error("name at {offset}+{len} does not fit in a {declared}-byte record")]
    NameOutOfBounds {
        offset: usize,
        len: usize,
        declared: usize,
    },
}

/// Why decoding of a batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStop {
    /// Every byte was consumed
    Exhausted,
    /// Fewer bytes than a common header were left over
    TrailingPartial { offset: usize, remaining: usize },
    /// Declared length was zero or ran past the batch
    BadLength { offset: usize, declared: usize },
}

/// Counters for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub records: u32,
    pub skipped_version: u32,
    pub skipped_malformed: u32,
    pub skipped_nameless: u32,
    pub stop: Option<DecodeStop>,
}

impl DecodeStats {
    pub fn skipped(&self) -> u32 {
        self.skipped_version + self.skipped_malformed + self.skipped_nameless
    }
}

/// Iterator over the valid records of one batch, in cursor order
#[derive(Debug, Clone)]
pub struct BatchDecoder<'a> {
    buf: &'a [u8],
    offset: usize,
    window: VersionWindow,
    next_usn: Usn,
    stats: DecodeStats,
}

impl<'a> BatchDecoder<'a> {
    /// Returns `None` when the buffer cannot even hold the cursor
    pub fn new(buf: &'a [u8], window: VersionWindow) -> Option<Self> {
        let next_usn = Usn(read_i64(buf, 0)?);
        Some(Self {
            buf,
            offset: CURSOR_LEN,
            window,
            next_usn,
            stats: DecodeStats::default(),
        })
    }

    /// Cursor the next read should start from
    pub fn next_usn(&self) -> Usn {
        self.next_usn
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    fn stop(&mut self, stop: DecodeStop) -> Option<ChangeRecord> {
        self.stats.stop = Some(stop);
        None
    }
}

impl Iterator for BatchDecoder<'_> {
    type Item = ChangeRecord;

    fn next(&mut self) -> Option<ChangeRecord> {
        loop {
            if self.stats.stop.is_some() {
                return None;
            }

            let offset = self.offset;
            let remaining = self.buf.len().saturating_sub(offset);
            if remaining == 0 {
                return self.stop(DecodeStop::Exhausted);
            }
            if remaining < COMMON_HEADER_LEN {
                return self.stop(DecodeStop::TrailingPartial { offset, remaining });
            }

            let (declared, version) = match read_header(self.buf, offset) {
                Some(header) => header,
                None => return self.stop(DecodeStop::TrailingPartial { offset, remaining }),
            };
            if declared == 0 || declared > remaining {
                tracing::warn!(offset, declared, remaining, "record length out of bounds, dropping rest of batch");
                return self.stop(DecodeStop::BadLength { offset, declared });
            }

            let Some(record) = self.buf.get(offset..offset + declared) else {
                return self.stop(DecodeStop::BadLength { offset, declared });
            };
            // Always advance by the declared length so trailing fields are skipped
            self.offset = offset + declared;

            if !self.window.contains(version.major) {
                tracing::trace!(offset, %version, "skipping record outside version window");
                self.stats.skipped_version += 1;
                continue;
            }

            match layout(version.major) {
                None => {
                    tracing::trace!(offset, %version, "skipping record with unknown layout");
                    self.stats.skipped_version += 1;
                }
                Some(Layout::NameLess) => {
                    self.stats.skipped_nameless += 1;
                }
                Some(Layout::Named(named)) => match decode_named(record, named, version) {
                    Ok(decoded) => {
                        self.stats.records += 1;
                        return Some(decoded);
                    }
                    Err(reason) => {
                        tracing::debug!(offset, %version, %reason, "skipping malformed record");
                        self.stats.skipped_malformed += 1;
                    }
                },
            }
        }
    }
}

fn read_header(buf: &[u8], offset: usize) -> Option<(usize, RecordVersion)> {
    let declared = read_u32(buf, offset)? as usize;
    let major = read_u16(buf, offset + 4)?;
    let minor = read_u16(buf, offset + 6)?;
    Some((declared, RecordVersion { major, minor }))
}

/// `record` is exactly the declared extent of one record
fn decode_named(
    record: &[u8],
    layout: NamedLayout,
    version: RecordVersion,
) -> Result<ChangeRecord, MalformedRecord> {
    let declared = record.len();
    let too_short = MalformedRecord::TooShort {
        declared,
        fixed: layout.fixed_len,
    };
    if declared < layout.fixed_len {
        return Err(too_short);
    }

    let name_len = read_u16(record, layout.name_len_at).ok_or(too_short.clone())? as usize;
    let name_offset = read_u16(record, layout.name_offset_at).ok_or(too_short.clone())? as usize;
    if name_len == 0 {
        return Err(MalformedRecord::EmptyName);
    }
    let out_of_bounds = MalformedRecord::NameOutOfBounds {
        offset: name_offset,
        len: name_len,
        declared,
    };
    if name_offset >= declared || name_len > declared || name_offset + name_len > declared {
        return Err(out_of_bounds);
    }
    let name_bytes = record
        .get(name_offset..name_offset + name_len)
        .ok_or(out_of_bounds)?;

    // One unit past the cap is enough to know the name was truncated
    let units: Vec<u16> = name_bytes
        .chunks_exact(2)
        .take(MAX_NAME_UNITS + 1)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    if units.is_empty() {
        return Err(MalformedRecord::EmptyName);
    }

    let (file_id, parent_file_id) = if layout.wide_ids {
        (
            read_u128(record, layout.file_id_at),
            read_u128(record, layout.parent_id_at),
        )
    } else {
        (
            read_u64(record, layout.file_id_at).map(u128::from),
            read_u64(record, layout.parent_id_at).map(u128::from),
        )
    };

    Ok(ChangeRecord {
        version,
        usn: Usn(read_i64(record, layout.usn_at).ok_or(too_short.clone())?),
        timestamp: read_i64(record, layout.timestamp_at).and_then(filetime_to_utc),
        reasons: ReasonMask(read_u32(record, layout.reason_at).ok_or(too_short.clone())?),
        file_id: FileId(file_id.ok_or(too_short.clone())?),
        parent_file_id: FileId(parent_file_id.ok_or(too_short.clone())?),
        attributes: read_u32(record, layout.attributes_at).ok_or(too_short)?,
        name: FileName::from_units(&units),
    })
}

fn read_array<const N: usize>(buf: &[u8], at: usize) -> Option<[u8; N]> {
    let end = at.checked_add(N)?;
    buf.get(at..end)?.try_into().ok()
}

fn read_u16(buf: &[u8], at: usize) -> Option<u16> {
    read_array(buf, at).map(u16::from_le_bytes)
}

fn read_u32(buf: &[u8], at: usize) -> Option<u32> {
    read_array(buf, at).map(u32::from_le_bytes)
}

fn read_u64(buf: &[u8], at: usize) -> Option<u64> {
    read_array(buf, at).map(u64::from_le_bytes)
}

fn read_i64(buf: &[u8], at: usize) -> Option<i64> {
    read_array(buf, at).map(i64::from_le_bytes)
}

fn read_u128(buf: &[u8], at: usize) -> Option<u128> {
    read_array(buf, at).map(u128::from_le_bytes)
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
