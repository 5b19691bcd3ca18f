// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    create = { ReasonMask::FILE_CREATE, ChangeKind::Create },
    delete = { ReasonMask::FILE_DELETE, ChangeKind::Delete },
    rename = { ReasonMask::RENAME_NEW_NAME, ChangeKind::Rename },
    overwrite = { ReasonMask::DATA_OVERWRITE, ChangeKind::Write },
    extend = { ReasonMask::DATA_EXTEND, ChangeKind::Write },
    truncation = { ReasonMask::DATA_TRUNCATION, ChangeKind::Other },
    old_name = { ReasonMask::RENAME_OLD_NAME, ChangeKind::Other },
    security = { ReasonMask::SECURITY_CHANGE, ChangeKind::Other },
    empty = { ReasonMask(0), ChangeKind::Other },
)]
fn single_reason(mask: ReasonMask, expected: ChangeKind) {
    assert_eq!(classify(mask), expected);
}

#[parameterized(
    create_beats_extend = { ReasonMask::FILE_CREATE | ReasonMask::DATA_EXTEND, ChangeKind::Create },
    create_beats_delete = { ReasonMask::FILE_CREATE | ReasonMask::FILE_DELETE, ChangeKind::Create },
    delete_beats_rename = { ReasonMask::FILE_DELETE | ReasonMask::RENAME_NEW_NAME, ChangeKind::Delete },
    delete_beats_overwrite = { ReasonMask::FILE_DELETE | ReasonMask::DATA_OVERWRITE, ChangeKind::Delete },
    rename_beats_extend = { ReasonMask::RENAME_NEW_NAME | ReasonMask::DATA_EXTEND, ChangeKind::Rename },
    write_with_close = { ReasonMask::DATA_EXTEND | ReasonMask::CLOSE, ChangeKind::Write },
)]
fn precedence(mask: ReasonMask, expected: ChangeKind) {
    assert_eq!(classify(mask), expected);
}

#[test]
fn classify_is_deterministic() {
    for bits in [0u32, 0x1, 0x2, 0x100, 0x200, 0x2000, 0x8000_0303, u32::MAX] {
        let mask = ReasonMask(bits);
        assert_eq!(classify(mask), classify(mask));
    }
}

#[test]
fn tags_are_fixed_width() {
    for kind in [
        ChangeKind::Create,
        ChangeKind::Delete,
        ChangeKind::Rename,
        ChangeKind::Write,
        ChangeKind::Other,
    ] {
        assert_eq!(kind.tag().len(), 6);
    }
    assert_eq!(ChangeKind::Write.to_string(), "WRITE");
}
