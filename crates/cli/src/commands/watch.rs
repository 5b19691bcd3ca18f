// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch command: stream change events until Ctrl-C

use crate::error::JwError;
use crate::output::{event_line, OutputFormat};
use anyhow::Result;
use async_trait::async_trait;
use jw_adapters::{open_volume, TracedJournal};
use jw_core::{ChangeEvent, StartAt, WatchConfig};
use jw_engine::{EventSink, Monitor, MonitorError, MonitorStats, Shutdown, SinkError};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Instrument;

const CHANNEL_DEPTH: usize = 1024;

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Volumes to watch (default: from configuration)
    volumes: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Replay every change the journal still retains before going live
    #[arg(long)]
    from_start: bool,

    /// Size of the read buffer in bytes
    #[arg(long)]
    max_batch_bytes: Option<usize>,
}

impl WatchArgs {
    /// Command-line values override the loaded configuration
    fn apply(&self, config: &mut WatchConfig) {
        if !self.volumes.is_empty() {
            config.volumes = self.volumes.clone();
        }
        if self.from_start {
            config.start = StartAt::First;
        }
        if let Some(bytes) = self.max_batch_bytes {
            config.max_batch_bytes = bytes;
        }
    }
}

/// Tags each event with the volume it came from
struct VolumeSink {
    volume: Arc<str>,
    tx: mpsc::Sender<(Arc<str>, ChangeEvent)>,
}

#[async_trait]
impl EventSink for VolumeSink {
    async fn emit(&mut self, event: ChangeEvent) -> Result<(), SinkError> {
        self.tx
            .send((self.volume.clone(), event))
            .await
            .map_err(|_| SinkError::Closed)
    }
}

pub async fn handle(args: WatchArgs, mut config: WatchConfig) -> Result<()> {
    args.apply(&mut config);
    config
        .validate()
        .map_err(|e| JwError::config_invalid(None, e))?;

    // Open every volume before printing anything so startup failures are clean
    let mut journals = Vec::with_capacity(config.volumes.len());
    for volume in &config.volumes {
        let journal = open_volume(volume).map_err(|e| JwError::open_failed(volume, e))?;
        journals.push((Arc::<str>::from(volume.as_str()), TracedJournal::new(volume, journal)));
    }

    let shutdown = Shutdown::new();
    let s = shutdown.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nStopping...");
        s.trigger();
    })?;

    eprintln!("Watching {} (Ctrl-C to stop)", config.volumes.join(", "));

    let (tx, mut rx) = mpsc::channel(CHANNEL_DEPTH);
    let mut tasks = Vec::with_capacity(journals.len());
    for (volume, journal) in journals {
        let sink = VolumeSink {
            volume: volume.clone(),
            tx: tx.clone(),
        };
        let mut monitor = Monitor::new(journal, sink, &config);
        let shutdown = shutdown.clone();
        let span = tracing::info_span!("monitor", volume = %volume);
        tasks.push(tokio::spawn(
            async move {
                let result = monitor.run(&shutdown).await;
                if result.is_err() {
                    // One failed volume stops the others
                    shutdown.trigger();
                }
                (volume, result)
            }
            .instrument(span),
        ));
    }
    drop(tx);

    let show_volume = config.volumes.len() > 1;
    let mut stdout = std::io::stdout().lock();
    while let Some((volume, event)) = rx.recv().await {
        let line = event_line(&volume, &event, args.format, show_volume)?;
        if writeln!(stdout, "{}", line).and_then(|_| stdout.flush()).is_err() {
            // Reader went away (e.g. closed pipe)
            shutdown.trigger();
            break;
        }
    }
    drop(stdout);
    drop(rx);

    let mut failure = None;
    for task in tasks {
        let (volume, result) = task.await?;
        match result {
            Ok(stats) => report(&volume, &stats),
            Err(MonitorError::SinkClosed(_)) => {}
            Err(e) => {
                tracing::error!(%volume, error = %e, "monitor failed");
                failure.get_or_insert_with(|| monitor_failure(&volume, e));
            }
        }
    }

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn report(volume: &str, stats: &MonitorStats) {
    eprintln!(
        "{}: {} events in {} batches ({} skipped records, {} recoveries)",
        volume, stats.events, stats.batches, stats.skipped_records, stats.recoveries
    );
}

fn monitor_failure(volume: &str, err: MonitorError) -> JwError {
    match err {
        MonitorError::Unavailable(e) => JwError::journal_unavailable(volume, &e.to_string()),
        other => JwError::new(format!("Stopped watching '{}'", volume))
            .with_context(other.to_string())
            .with_suggestion("Raise [transient] or [recovery] max_consecutive_failures, or unset them to retry forever"),
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
