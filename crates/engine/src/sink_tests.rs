// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jw_core::{ChangeKind, ReasonMask, RecordVersion, Usn};

fn event(name: &str) -> ChangeEvent {
    ChangeEvent {
        kind: ChangeKind::Create,
        version: RecordVersion { major: 3, minor: 0 },
        reasons: ReasonMask::FILE_CREATE,
        usn: Usn(1),
        parent_file_id: 5,
        file_id: 9,
        name: name.to_string(),
        timestamp: None,
    }
}

#[tokio::test]
async fn vec_sink_keeps_order() {
    let mut sink: Vec<ChangeEvent> = Vec::new();
    sink.emit(event("a")).await.unwrap();
    sink.emit(event("b")).await.unwrap();

    let names: Vec<_> = sink.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test]
async fn channel_sink_forwards_events() {
    let (mut tx, mut rx) = mpsc::channel(4);
    tx.emit(event("a")).await.unwrap();

    assert_eq!(rx.recv().await.unwrap().name, "a");
}

#[tokio::test]
async fn channel_sink_closes_with_receiver() {
    let (mut tx, rx) = mpsc::channel(4);
    drop(rx);

    assert_eq!(tx.emit(event("a")).await, Err(SinkError::Closed));
}
