// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jwatch poll engine: session management, batch reads and the monitor loop

mod error;
mod monitor;
mod reader;
mod session;
mod shutdown;
mod sink;

pub use error::MonitorError;
pub use monitor::{Monitor, MonitorState, MonitorStats};
pub use reader::{BatchReader, ChangeBatch, ReadError};
pub use session::{open_session, reestablish_session, SessionError};
pub use shutdown::Shutdown;
pub use sink::{EventSink, SinkError};
