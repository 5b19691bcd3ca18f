// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synthetic change batches for tests
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::journal::Usn;
use crate::reason::ReasonMask;

/// One record to encode; fields left alone produce a well-formed record
#[derive(Debug, Clone)]
pub struct RecordSpec {
    major: u16,
    minor: u16,
    usn: i64,
    timestamp: i64,
    reasons: ReasonMask,
    file_id: u128,
    parent_file_id: u128,
    attributes: u32,
    name: Vec<u16>,
    name_offset: Option<u16>,
    name_len: Option<u16>,
    record_len: Option<u32>,
    claimed_len: Option<u32>,
    trailing: usize,
}

impl RecordSpec {
    fn new(major: u16, name: &str) -> Self {
        Self {
            major,
            minor: 0,
            usn: 0,
            timestamp: 0,
            reasons: ReasonMask::FILE_CREATE,
            file_id: 1,
            parent_file_id: 5,
            attributes: 0x20,
            name: name.encode_utf16().collect(),
            name_offset: None,
            name_len: None,
            record_len: None,
            claimed_len: None,
            trailing: 0,
        }
    }

    pub fn v2(name: &str) -> Self {
        Self::new(2, name)
    }

    pub fn v3(name: &str) -> Self {
        Self::new(3, name)
    }

    /// Range-tracking record without a name
    pub fn v4() -> Self {
        Self::new(4, "")
    }

    /// Override the major version; unknown majors use the V3 field layout
    pub fn major(mut self, major: u16) -> Self {
        self.major = major;
        self
    }

    pub fn minor(mut self, minor: u16) -> Self {
        self.minor = minor;
        self
    }

    pub fn usn(mut self, usn: i64) -> Self {
        self.usn = usn;
        self
    }

    pub fn timestamp(mut self, ticks: i64) -> Self {
        self.timestamp = ticks;
        self
    }

    pub fn reasons(mut self, reasons: ReasonMask) -> Self {
        self.reasons = reasons;
        self
    }

    pub fn file_id(mut self, id: u128) -> Self {
        self.file_id = id;
        self
    }

    pub fn parent(mut self, id: u128) -> Self {
        self.parent_file_id = id;
        self
    }

    pub fn name_units(mut self, units: Vec<u16>) -> Self {
        self.name = units;
        self
    }

    /// Write this value into the name offset field
    pub fn name_offset(mut self, offset: u16) -> Self {
        self.name_offset = Some(offset);
        self
    }

    /// Write this value into the name length field
    pub fn name_len(mut self, len: u16) -> Self {
        self.name_len = Some(len);
        self
    }

    /// Declare this length and cut or zero-pad the body to match
    pub fn record_len(mut self, len: u32) -> Self {
        self.record_len = Some(len);
        self
    }

    /// Declare this length but keep the natural body
    pub fn claim_len(mut self, len: u32) -> Self {
        self.claimed_len = Some(len);
        self
    }

    /// Extra bytes after the name, as newer minors may append
    pub fn trailing(mut self, bytes: usize) -> Self {
        self.trailing = bytes;
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut body = match self.major {
            2 => self.encode_v2(),
            4 => self.encode_v4(),
            _ => self.encode_v3(),
        };
        if let Some(len) = self.record_len {
            body.resize(len as usize, 0);
        }
        let declared = self
            .claimed_len
            .or(self.record_len)
            .unwrap_or(body.len() as u32);
        if body.len() >= 4 {
            body[0..4].copy_from_slice(&declared.to_le_bytes());
        }
        body
    }

    fn name_bytes(&self) -> Vec<u8> {
        self.name.iter().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn finish(&self, mut body: Vec<u8>, name_len_at: usize, fixed: usize) -> Vec<u8> {
        let name = self.name_bytes();
        let name_len = self.name_len.unwrap_or(name.len() as u16);
        let name_offset = self.name_offset.unwrap_or(fixed as u16);
        body[name_len_at..name_len_at + 2].copy_from_slice(&name_len.to_le_bytes());
        body[name_len_at + 2..name_len_at + 4].copy_from_slice(&name_offset.to_le_bytes());
        body.extend_from_slice(&name);
        body.extend(std::iter::repeat(0).take(self.trailing));
        let padded = body.len().div_ceil(8) * 8;
        body.resize(padded, 0);
        body
    }

    fn header(&self, fixed: usize) -> Vec<u8> {
        let mut body = vec![0u8; fixed];
        body[4..6].copy_from_slice(&self.major.to_le_bytes());
        body[6..8].copy_from_slice(&self.minor.to_le_bytes());
        body
    }

    fn encode_v2(&self) -> Vec<u8> {
        let mut body = self.header(60);
        body[8..16].copy_from_slice(&(self.file_id as u64).to_le_bytes());
        body[16..24].copy_from_slice(&(self.parent_file_id as u64).to_le_bytes());
        body[24..32].copy_from_slice(&self.usn.to_le_bytes());
        body[32..40].copy_from_slice(&self.timestamp.to_le_bytes());
        body[40..44].copy_from_slice(&self.reasons.bits().to_le_bytes());
        body[52..56].copy_from_slice(&self.attributes.to_le_bytes());
        self.finish(body, 56, 60)
    }

    fn encode_v3(&self) -> Vec<u8> {
        let mut body = self.header(76);
        body[8..24].copy_from_slice(&self.file_id.to_le_bytes());
        body[24..40].copy_from_slice(&self.parent_file_id.to_le_bytes());
        body[40..48].copy_from_slice(&self.usn.to_le_bytes());
        body[48..56].copy_from_slice(&self.timestamp.to_le_bytes());
        body[56..60].copy_from_slice(&self.reasons.bits().to_le_bytes());
        body[68..72].copy_from_slice(&self.attributes.to_le_bytes());
        self.finish(body, 72, 76)
    }

    fn encode_v4(&self) -> Vec<u8> {
        let mut body = self.header(64);
        body[8..24].copy_from_slice(&self.file_id.to_le_bytes());
        body[24..40].copy_from_slice(&self.parent_file_id.to_le_bytes());
        body[40..48].copy_from_slice(&self.usn.to_le_bytes());
        body[48..52].copy_from_slice(&self.reasons.bits().to_le_bytes());
        body
    }
}

/// Builds a raw batch: cursor followed by records
#[derive(Debug, Clone)]
pub struct BatchBuilder {
    bytes: Vec<u8>,
}

impl BatchBuilder {
    pub fn new(next_usn: Usn) -> Self {
        Self {
            bytes: next_usn.0.to_le_bytes().to_vec(),
        }
    }

    pub fn record(mut self, spec: RecordSpec) -> Self {
        self.bytes.extend(spec.encode());
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
