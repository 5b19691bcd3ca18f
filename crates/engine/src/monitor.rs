// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Poll loop for one volume.
//!
//! ```text
//! Establishing --open--> Polling --empty--> Idling --delay--> Polling
//!                           |  ^
//!               invalidated |  | reestablished
//!                           v  |
//!                        Recovering (backoff until reestablished)
//! ```
//!
//! Transient read failures stay in Polling and retry the same cursor after
//! the transient policy's delay. Only the initial session can fail fatally.

use crate::error::MonitorError;
use crate::reader::{BatchReader, ReadError};
use crate::session::{open_session, reestablish_session};
use crate::shutdown::Shutdown;
use crate::sink::EventSink;
use jw_adapters::ChangeJournal;
use jw_core::{Backoff, ChangeEvent, JournalSession, RetryAction, Usn, WatchConfig};
use std::time::Duration;

/// Where the poll loop is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Establishing,
    Polling,
    Idling,
    Recovering,
}

/// Counters accumulated over a monitor's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub batches: u64,
    pub events: u64,
    pub skipped_records: u64,
    pub idle_polls: u64,
    pub transient_failures: u64,
    pub recoveries: u64,
}

/// Drives session, reader, decoder and classifier for one journal
pub struct Monitor<J, S> {
    journal: J,
    sink: S,
    config: WatchConfig,
    reader: BatchReader,
    state: MonitorState,
    session: Option<JournalSession>,
    cursor: Usn,
    transient: Backoff,
    recovery: Backoff,
    stats: MonitorStats,
}

impl<J: ChangeJournal, S: EventSink> Monitor<J, S> {
    pub fn new(journal: J, sink: S, config: &WatchConfig) -> Self {
        Self {
            journal,
            sink,
            reader: BatchReader::new(
                config.max_batch_bytes,
                config.versions,
                config.return_only_on_close,
            ),
            state: MonitorState::Establishing,
            session: None,
            cursor: Usn::default(),
            transient: Backoff::new(config.transient.clone()),
            recovery: Backoff::new(config.recovery.clone()),
            stats: MonitorStats::default(),
            config: config.clone(),
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Cursor the next read starts from
    pub fn cursor(&self) -> Usn {
        self.cursor
    }

    pub fn session(&self) -> Option<&JournalSession> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Step until shutdown is observed at the top of an iteration
    pub async fn run(&mut self, shutdown: &Shutdown) -> Result<MonitorStats, MonitorError> {
        loop {
            if shutdown.is_triggered() {
                tracing::info!(cursor = %self.cursor, "monitor stopping");
                return Ok(self.stats);
            }
            self.step(shutdown).await?;
        }
    }

    /// Perform one transition, including the delay that follows it.
    ///
    /// Returns the state the monitor is in afterwards.
    pub async fn step(&mut self, shutdown: &Shutdown) -> Result<MonitorState, MonitorError> {
        let (next, pause) = match self.state {
            MonitorState::Establishing => self.establish().await?,
            MonitorState::Polling => self.poll().await?,
            MonitorState::Idling => (MonitorState::Polling, self.config.idle_delay),
            MonitorState::Recovering => self.recover().await?,
        };

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, "state change");
        }
        self.state = next;
        if !pause.is_zero() {
            shutdown.sleep(pause).await;
        }
        Ok(next)
    }

    async fn establish(&mut self) -> Result<(MonitorState, Duration), MonitorError> {
        let session = open_session(&self.journal).await?;
        self.cursor = session.start_usn(self.config.start);
        self.session = Some(session);
        Ok((MonitorState::Polling, Duration::ZERO))
    }

    async fn poll(&mut self) -> Result<(MonitorState, Duration), MonitorError> {
        let Some(session) = self.session else {
            return Ok((MonitorState::Establishing, Duration::ZERO));
        };

        let batch = match self
            .reader
            .read_next(&self.journal, &session, self.cursor)
            .await
        {
            Ok(batch) => batch,
            Err(ReadError::Empty) => {
                self.transient.reset();
                self.stats.idle_polls += 1;
                tracing::trace!(cursor = %self.cursor, "no new changes");
                return Ok((MonitorState::Idling, Duration::ZERO));
            }
            Err(ReadError::Invalidated(reason)) => {
                tracing::warn!(
                    journal_id = %session.journal_id(),
                    cursor = %self.cursor,
                    %reason,
                    "journal invalidated, re-querying identity"
                );
                return Ok((MonitorState::Recovering, Duration::ZERO));
            }
            Err(ReadError::Transient(reason)) => {
                self.stats.transient_failures += 1;
                return match self.transient.record_failure() {
                    RetryAction::Retry { delay } => {
                        tracing::warn!(
                            cursor = %self.cursor,
                            %reason,
                            delay_ms = delay.as_millis() as u64,
                            "read failed, retrying"
                        );
                        Ok((MonitorState::Polling, delay))
                    }
                    RetryAction::GiveUp { failures } => Err(MonitorError::RetriesExhausted {
                        what: "journal read",
                        failures,
                    }),
                };
            }
        };
        self.transient.reset();

        let next_usn = batch.next_usn();
        let mut records = batch.into_records();
        for record in records.by_ref() {
            self.sink.emit(ChangeEvent::from(&record)).await?;
            self.stats.events += 1;
        }
        let decoded = records.stats();
        self.stats.skipped_records += u64::from(decoded.skipped());
        tracing::debug!(
            records = decoded.records,
            skipped_version = decoded.skipped_version,
            skipped_malformed = decoded.skipped_malformed,
            skipped_nameless = decoded.skipped_nameless,
            stop = ?decoded.stop,
            next_usn = %next_usn,
            "decoded batch"
        );

        self.stats.batches += 1;
        self.cursor = next_usn;
        Ok((MonitorState::Polling, self.config.batch_delay))
    }

    async fn recover(&mut self) -> Result<(MonitorState, Duration), MonitorError> {
        let result = match &self.session {
            Some(stale) => reestablish_session(&self.journal, stale).await,
            None => open_session(&self.journal).await,
        };

        match result {
            Ok(session) => {
                self.recovery.reset();
                self.stats.recoveries += 1;
                self.cursor = session.next_usn();
                self.session = Some(session);
                Ok((MonitorState::Polling, Duration::ZERO))
            }
            Err(e) => match self.recovery.record_failure() {
                RetryAction::Retry { delay } => {
                    tracing::warn!(
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "reestablish failed, retrying"
                    );
                    Ok((MonitorState::Recovering, delay))
                }
                RetryAction::GiveUp { failures } => Err(MonitorError::RetriesExhausted {
                    what: "journal recovery",
                    failures,
                }),
            },
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
