// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jw_adapters::{FakeJournal, JournalError};
use jw_core::testing::{BatchBuilder, RecordSpec};
use jw_core::{ChangeKind, JournalData, JournalId, ReasonMask, RetryPolicy, StartAt};
use tokio::sync::mpsc;
use tokio::time::Instant;

fn identity(id: u64, first: i64, next: i64) -> JournalData {
    JournalData::new(JournalId(id), Usn(first), Usn(next))
}

fn batch(next: i64, names: &[&str]) -> Vec<u8> {
    names
        .iter()
        .fold(BatchBuilder::new(Usn(next)), |b, name| {
            b.record(RecordSpec::v3(name))
        })
        .build()
}

fn monitor(journal: &FakeJournal, config: &WatchConfig) -> Monitor<FakeJournal, Vec<ChangeEvent>> {
    Monitor::new(journal.clone(), Vec::new(), config)
}

fn names(monitor: &Monitor<FakeJournal, Vec<ChangeEvent>>) -> Vec<String> {
    monitor.sink().iter().map(|e| e.name.clone()).collect()
}

fn read_starts(journal: &FakeJournal) -> Vec<Usn> {
    journal.reads().iter().map(|r| r.start_usn).collect()
}

// =============================================================================
// Establishing
// =============================================================================

#[tokio::test(start_paused = true)]
async fn establishing_starts_at_next_usn() {
    let journal = FakeJournal::new(identity(1, 100, 1000));
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();

    let state = monitor.step(&shutdown).await.unwrap();

    assert_eq!(state, MonitorState::Polling);
    assert_eq!(monitor.cursor(), Usn(1000));
    assert_eq!(monitor.session().unwrap().journal_id(), JournalId(1));
}

#[tokio::test(start_paused = true)]
async fn start_at_first_reads_retained_history() {
    let journal = FakeJournal::new(identity(1, 100, 1000));
    let config = WatchConfig {
        start: StartAt::First,
        ..WatchConfig::default()
    };
    let mut monitor = monitor(&journal, &config);
    let shutdown = Shutdown::new();

    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();

    assert_eq!(read_starts(&journal), vec![Usn(100)]);
}

#[tokio::test(start_paused = true)]
async fn establishing_failure_is_fatal() {
    let journal = FakeJournal::default();
    let mut monitor = monitor(&journal, &WatchConfig::default());

    let err = monitor.step(&Shutdown::new()).await.unwrap_err();

    assert!(matches!(err, MonitorError::Unavailable(_)));
    assert_eq!(monitor.state(), MonitorState::Establishing);
    assert!(journal.reads().is_empty());
}

// =============================================================================
// Polling
// =============================================================================

#[tokio::test(start_paused = true)]
async fn batch_events_are_emitted_in_order_and_cursor_advances() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_batch(batch(1100, &["a.txt", "b.txt"]));
    journal.push_batch(batch(1200, &["c.txt"]));
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();

    for _ in 0..3 {
        monitor.step(&shutdown).await.unwrap();
    }

    assert_eq!(names(&monitor), vec!["a.txt", "b.txt", "c.txt"]);
    assert_eq!(monitor.cursor(), Usn(1200));
    assert_eq!(read_starts(&journal), vec![Usn(1000), Usn(1100)]);
    assert_eq!(monitor.stats().batches, 2);
    assert_eq!(monitor.stats().events, 3);
}

#[tokio::test(start_paused = true)]
async fn cursor_never_regresses_across_batches() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    for next in [1010, 1020, 1020, 1500, 2000] {
        journal.push_batch(batch(next, &["f"]));
    }
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();

    let mut cursors = Vec::new();
    for _ in 0..6 {
        monitor.step(&shutdown).await.unwrap();
        cursors.push(monitor.cursor());
    }

    assert!(cursors.windows(2).all(|w| w[0] <= w[1]), "{:?}", cursors);
    let starts = read_starts(&journal);
    assert!(starts.windows(2).all(|w| w[0] <= w[1]), "{:?}", starts);
}

#[tokio::test(start_paused = true)]
async fn batch_is_followed_by_batch_delay() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_batch(batch(1100, &["a.txt"]));
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();
    monitor.step(&shutdown).await.unwrap();

    let start = Instant::now();
    monitor.step(&shutdown).await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn events_carry_classification_and_parent() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_batch(
        BatchBuilder::new(Usn(1100))
            .record(
                RecordSpec::v3("report.docx")
                    .reasons(ReasonMask::FILE_DELETE | ReasonMask::CLOSE)
                    .parent((0xFFFF_u128 << 64) | 0x1A2B)
                    .usn(1050),
            )
            .build(),
    );
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();

    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();

    let event = &monitor.sink()[0];
    assert_eq!(event.kind, ChangeKind::Delete);
    assert_eq!(event.parent_file_id, 0x1A2B);
    assert_eq!(event.usn, Usn(1050));
    assert_eq!(event.to_string(), "[DELETE] [V3.0][ParentFRN:1A2B] report.docx");
}

#[tokio::test(start_paused = true)]
async fn below_window_records_do_not_corrupt_later_ones() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_batch(
        BatchBuilder::new(Usn(1100))
            .record(RecordSpec::v2("old-layout.txt"))
            .record(RecordSpec::v3("kept.txt"))
            .record(RecordSpec::v4())
            .record(RecordSpec::v3("also-kept.txt"))
            .build(),
    );
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();

    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();

    assert_eq!(names(&monitor), vec!["kept.txt", "also-kept.txt"]);
    assert_eq!(monitor.stats().skipped_records, 2);
}

#[tokio::test(start_paused = true)]
async fn long_names_are_truncated_for_rendering() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_batch(
        BatchBuilder::new(Usn(2400))
            .record(RecordSpec::v3("").name_units(vec![u16::from(b'x'); 600]))
            .build(),
    );
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();

    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();

    assert_eq!(monitor.sink()[0].name.chars().count(), 255);
}

// =============================================================================
// Idling
// =============================================================================

#[tokio::test(start_paused = true)]
async fn empty_batch_idles_without_advancing_or_emitting() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();
    monitor.step(&shutdown).await.unwrap();

    assert_eq!(monitor.step(&shutdown).await.unwrap(), MonitorState::Idling);
    assert_eq!(monitor.cursor(), Usn(1000));

    let start = Instant::now();
    assert_eq!(monitor.step(&shutdown).await.unwrap(), MonitorState::Polling);
    assert_eq!(start.elapsed(), Duration::from_millis(100));

    monitor.step(&shutdown).await.unwrap();
    assert_eq!(read_starts(&journal), vec![Usn(1000), Usn(1000)]);
    assert!(monitor.sink().is_empty());
    assert_eq!(monitor.stats().idle_polls, 2);
}

// =============================================================================
// Recovery
// =============================================================================

#[tokio::test(start_paused = true)]
async fn invalidation_on_third_read_reestablishes_once() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_batch(batch(1100, &["one"]));
    journal.push_batch(batch(1200, &["two"]));
    journal.push_read_error(JournalError::Invalidated("journal entry deleted".to_string()));
    journal.push_query(Ok(identity(1, 0, 1000)));
    journal.push_query(Ok(identity(2, 0, 50)));
    journal.push_batch(batch(80, &["three"]));
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();

    let mut states = Vec::new();
    for _ in 0..6 {
        states.push(monitor.step(&shutdown).await.unwrap());
    }

    assert_eq!(
        states,
        vec![
            MonitorState::Polling,
            MonitorState::Polling,
            MonitorState::Polling,
            MonitorState::Recovering,
            MonitorState::Polling,
            MonitorState::Polling,
        ]
    );
    assert_eq!(journal.query_count(), 2);
    assert_eq!(
        read_starts(&journal),
        vec![Usn(1000), Usn(1100), Usn(1200), Usn(50)]
    );
    assert_eq!(journal.reads()[3].journal_id, JournalId(2));
    assert_eq!(names(&monitor), vec!["one", "two", "three"]);
    assert_eq!(monitor.stats().recoveries, 1);
}

#[tokio::test(start_paused = true)]
async fn recovery_ignores_start_at_first() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_read_error(JournalError::Invalidated("not active".to_string()));
    let config = WatchConfig {
        start: StartAt::First,
        ..WatchConfig::default()
    };
    let mut monitor = monitor(&journal, &config);
    let shutdown = Shutdown::new();
    monitor.step(&shutdown).await.unwrap();
    journal.set_identity(identity(3, 10, 700));

    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();

    assert_eq!(monitor.cursor(), Usn(700));
}

#[tokio::test(start_paused = true)]
async fn failed_reestablish_backs_off_and_retries() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_read_error(JournalError::Invalidated("entry deleted".to_string()));
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();
    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();
    journal.push_query(Err(JournalError::Unavailable("delete in progress".to_string())));
    journal.push_query(Err(JournalError::Unavailable("delete in progress".to_string())));
    journal.push_query(Ok(identity(2, 0, 64)));

    let start = Instant::now();
    assert_eq!(monitor.step(&shutdown).await.unwrap(), MonitorState::Recovering);
    assert_eq!(start.elapsed(), Duration::from_millis(500));
    assert_eq!(monitor.step(&shutdown).await.unwrap(), MonitorState::Recovering);
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
    assert_eq!(monitor.step(&shutdown).await.unwrap(), MonitorState::Polling);

    assert_eq!(monitor.cursor(), Usn(64));
    assert_eq!(journal.query_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn recovery_gives_up_when_bounded() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_read_error(JournalError::Invalidated("entry deleted".to_string()));
    let config = WatchConfig {
        recovery: RetryPolicy::fixed(Duration::from_millis(100)).with_max_failures(1),
        ..WatchConfig::default()
    };
    let mut monitor = monitor(&journal, &config);
    let shutdown = Shutdown::new();
    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();
    for _ in 0..2 {
        journal.push_query(Err(JournalError::Unavailable("gone".to_string())));
    }

    assert!(monitor.step(&shutdown).await.is_ok());
    let err = monitor.step(&shutdown).await.unwrap_err();

    assert_eq!(
        err,
        MonitorError::RetriesExhausted {
            what: "journal recovery",
            failures: 2
        }
    );
}

// =============================================================================
// Transient failures
// =============================================================================

#[tokio::test(start_paused = true)]
async fn transient_failure_retries_same_cursor_after_delay() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_read_error(JournalError::Transient("device busy".to_string()));
    journal.push_batch(batch(1100, &["after.txt"]));
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();
    monitor.step(&shutdown).await.unwrap();

    let start = Instant::now();
    assert_eq!(monitor.step(&shutdown).await.unwrap(), MonitorState::Polling);
    assert_eq!(start.elapsed(), Duration::from_millis(500));
    assert_eq!(monitor.cursor(), Usn(1000));

    monitor.step(&shutdown).await.unwrap();

    assert_eq!(read_starts(&journal), vec![Usn(1000), Usn(1000)]);
    assert_eq!(names(&monitor), vec!["after.txt"]);
    assert_eq!(monitor.stats().transient_failures, 1);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_give_up_when_bounded() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    for _ in 0..3 {
        journal.push_read_error(JournalError::Transient("busy".to_string()));
    }
    let config = WatchConfig {
        transient: RetryPolicy::fixed(Duration::from_millis(500)).with_max_failures(2),
        ..WatchConfig::default()
    };
    let mut monitor = monitor(&journal, &config);
    let shutdown = Shutdown::new();
    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();
    monitor.step(&shutdown).await.unwrap();

    let err = monitor.step(&shutdown).await.unwrap_err();

    assert!(matches!(
        err,
        MonitorError::RetriesExhausted { failures: 3, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn successful_read_resets_transient_counter() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_read_error(JournalError::Transient("busy".to_string()));
    journal.push_read_error(JournalError::Transient("busy".to_string()));
    journal.push_batch(batch(1100, &["ok"]));
    journal.push_read_error(JournalError::Transient("busy".to_string()));
    journal.push_read_error(JournalError::Transient("busy".to_string()));
    let config = WatchConfig {
        transient: RetryPolicy::fixed(Duration::from_millis(500)).with_max_failures(2),
        ..WatchConfig::default()
    };
    let mut monitor = monitor(&journal, &config);
    let shutdown = Shutdown::new();

    for _ in 0..6 {
        monitor.step(&shutdown).await.unwrap();
    }

    assert_eq!(monitor.stats().transient_failures, 4);
}

// =============================================================================
// Sink and shutdown
// =============================================================================

#[tokio::test(start_paused = true)]
async fn closed_sink_stops_monitor() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_batch(batch(1100, &["lost.txt"]));
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let mut monitor = Monitor::new(journal.clone(), tx, &WatchConfig::default());
    let shutdown = Shutdown::new();
    monitor.step(&shutdown).await.unwrap();

    let err = monitor.step(&shutdown).await.unwrap_err();

    assert!(matches!(err, MonitorError::SinkClosed(_)));
    assert_eq!(monitor.cursor(), Usn(1000));
}

#[tokio::test(start_paused = true)]
async fn run_returns_stats_after_shutdown() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    journal.push_batch(batch(1100, &["a", "b"]));
    journal.push_batch(batch(1200, &["c"]));
    let (tx, mut rx) = mpsc::channel(16);
    let mut monitor = Monitor::new(journal.clone(), tx, &WatchConfig::default());
    let shutdown = Shutdown::new();

    let stopper = shutdown.clone();
    let collector = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event.name);
            if seen.len() == 3 {
                tokio::time::sleep(Duration::from_secs(1)).await;
                stopper.trigger();
            }
        }
        seen
    });

    let stats = monitor.run(&shutdown).await.unwrap();
    drop(monitor);

    assert_eq!(stats.batches, 2);
    assert_eq!(stats.events, 3);
    assert!(stats.idle_polls > 0);
    assert_eq!(collector.await.unwrap(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn run_observes_shutdown_before_first_step() {
    let journal = FakeJournal::new(identity(1, 0, 1000));
    let mut monitor = monitor(&journal, &WatchConfig::default());
    let shutdown = Shutdown::new();
    shutdown.trigger();

    let stats = monitor.run(&shutdown).await.unwrap();

    assert_eq!(stats, MonitorStats::default());
    assert!(journal.calls().is_empty());
}
