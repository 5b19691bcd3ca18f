// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Destinations for change events

use async_trait::async_trait;
use jw_core::ChangeEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from delivering an event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("event sink closed")]
    Closed,
}

/// Receives events in the order they were produced
#[async_trait]
pub trait EventSink: Send + 'static {
    async fn emit(&mut self, event: ChangeEvent) -> Result<(), SinkError>;
}

/// Collects events in memory
#[async_trait]
impl EventSink for Vec<ChangeEvent> {
    async fn emit(&mut self, event: ChangeEvent) -> Result<(), SinkError> {
        self.push(event);
        Ok(())
    }
}

/// Forwards events to a channel; a dropped receiver closes the sink
#[async_trait]
impl EventSink for mpsc::Sender<ChangeEvent> {
    async fn emit(&mut self, event: ChangeEvent) -> Result<(), SinkError> {
        self.send(event).await.map_err(|_| SinkError::Closed)
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
