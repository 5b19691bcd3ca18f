// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reason bitmask carried by every journal record

use serde::{Serialize, Serializer};

static REASON_NAMES: [(ReasonMask, &str); 23] = [
    (ReasonMask::DATA_OVERWRITE, "DATA_OVERWRITE"),
    (ReasonMask::DATA_EXTEND, "DATA_EXTEND"),
    (ReasonMask::DATA_TRUNCATION, "DATA_TRUNCATION"),
    (ReasonMask::NAMED_DATA_OVERWRITE, "NAMED_DATA_OVERWRITE"),
    (ReasonMask::NAMED_DATA_EXTEND, "NAMED_DATA_EXTEND"),
    (ReasonMask::NAMED_DATA_TRUNCATION, "NAMED_DATA_TRUNCATION"),
    (ReasonMask::FILE_CREATE, "FILE_CREATE"),
    (ReasonMask::FILE_DELETE, "FILE_DELETE"),
    (ReasonMask::EA_CHANGE, "EA_CHANGE"),
    (ReasonMask::SECURITY_CHANGE, "SECURITY_CHANGE"),
    (ReasonMask::RENAME_OLD_NAME, "RENAME_OLD_NAME"),
    (ReasonMask::RENAME_NEW_NAME, "RENAME_NEW_NAME"),
    (ReasonMask::INDEXABLE_CHANGE, "INDEXABLE_CHANGE"),
    (ReasonMask::BASIC_INFO_CHANGE, "BASIC_INFO_CHANGE"),
    (ReasonMask::HARD_LINK_CHANGE, "HARD_LINK_CHANGE"),
    (ReasonMask::COMPRESSION_CHANGE, "COMPRESSION_CHANGE"),
    (ReasonMask::ENCRYPTION_CHANGE, "ENCRYPTION_CHANGE"),
    (ReasonMask::OBJECT_ID_CHANGE, "OBJECT_ID_CHANGE"),
    (ReasonMask::REPARSE_POINT_CHANGE, "REPARSE_POINT_CHANGE"),
    (ReasonMask::STREAM_CHANGE, "STREAM_CHANGE"),
    (ReasonMask::TRANSACTED_CHANGE, "TRANSACTED_CHANGE"),
    (ReasonMask::INTEGRITY_CHANGE, "INTEGRITY_CHANGE"),
    (ReasonMask::CLOSE, "CLOSE"),
];

/// Set of reasons a record was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReasonMask(pub u32);

impl ReasonMask {
    pub const DATA_OVERWRITE: Self = Self(0x0000_0001);
    pub const DATA_EXTEND: Self = Self(0x0000_0002);
    pub const DATA_TRUNCATION: Self = Self(0x0000_0004);
    pub const NAMED_DATA_OVERWRITE: Self = Self(0x0000_0010);
    pub const NAMED_DATA_EXTEND: Self = Self(0x0000_0020);
    pub const NAMED_DATA_TRUNCATION: Self = Self(0x0000_0040);
    pub const FILE_CREATE: Self = Self(0x0000_0100);
    pub const FILE_DELETE: Self = Self(0x0000_0200);
    pub const EA_CHANGE: Self = Self(0x0000_0400);
    pub const SECURITY_CHANGE: Self = Self(0x0000_0800);
    pub const RENAME_OLD_NAME: Self = Self(0x0000_1000);
    pub const RENAME_NEW_NAME: Self = Self(0x0000_2000);
    pub const INDEXABLE_CHANGE: Self = Self(0x0000_4000);
    pub const BASIC_INFO_CHANGE: Self = Self(0x0000_8000);
    pub const HARD_LINK_CHANGE: Self = Self(0x0001_0000);
    pub const COMPRESSION_CHANGE: Self = Self(0x0002_0000);
    pub const ENCRYPTION_CHANGE: Self = Self(0x0004_0000);
    pub const OBJECT_ID_CHANGE: Self = Self(0x0008_0000);
    pub const REPARSE_POINT_CHANGE: Self = Self(0x0010_0000);
    pub const STREAM_CHANGE: Self = Self(0x0020_0000);
    pub const TRANSACTED_CHANGE: Self = Self(0x0040_0000);
    pub const INTEGRITY_CHANGE: Self = Self(0x0080_0000);
    pub const CLOSE: Self = Self(0x8000_0000);

    /// Reasons requested from the facility: content and namespace changes
    /// only. Attribute and security churn is left out.
    pub const CHANGE_FILTER: Self = Self(
        Self::FILE_CREATE.0
            | Self::FILE_DELETE.0
            | Self::RENAME_NEW_NAME.0
            | Self::DATA_OVERWRITE.0
            | Self::DATA_EXTEND.0,
    );

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// All bits of `other` are set
    pub fn contains(self, other: ReasonMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Any bit of `other` is set
    pub fn intersects(self, other: ReasonMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Names of the known reasons present, lowest bit first
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        REASON_NAMES
            .iter()
            .filter(move |(flag, _)| self.intersects(*flag))
            .map(|(_, name)| *name)
    }

    /// Bits that have no name in this version
    pub fn unknown_bits(self) -> u32 {
        let known = REASON_NAMES.iter().fold(0, |acc, (flag, _)| acc | flag.0);
        self.0 & !known
    }
}

impl std::ops::BitOr for ReasonMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ReasonMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for ReasonMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Display for ReasonMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        let mut first = true;
        for name in self.names() {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{}", name)?;
            first = false;
        }
        let unknown = self.unknown_bits();
        if unknown != 0 {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "0x{:X}", unknown)?;
        }
        Ok(())
    }
}

impl Serialize for ReasonMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

#[cfg(test)]
#[path = "reason_tests.rs"]
mod tests;
