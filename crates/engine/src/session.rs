// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal session establishment and recovery

use jw_adapters::ChangeJournal;
use jw_core::JournalSession;
use thiserror::Error;

/// Errors from establishing a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("change journal unavailable: {0}")]
    Unavailable(String),
}

/// Query the journal identity and build the first session
pub async fn open_session<J: ChangeJournal>(journal: &J) -> Result<JournalSession, SessionError> {
    let session = query_session(journal).await?;
    tracing::info!(
        journal_id = %session.journal_id(),
        first_usn = %session.first_usn(),
        next_usn = %session.next_usn(),
        "journal session established"
    );
    Ok(session)
}

/// Replace a session after its journal was invalidated.
///
/// Changes between the stale cursor and the new session's next cursor are
/// not replayed.
pub async fn reestablish_session<J: ChangeJournal>(
    journal: &J,
    stale: &JournalSession,
) -> Result<JournalSession, SessionError> {
    let session = query_session(journal).await?;
    tracing::info!(
        old_journal_id = %stale.journal_id(),
        journal_id = %session.journal_id(),
        next_usn = %session.next_usn(),
        "journal session reestablished"
    );
    Ok(session)
}

async fn query_session<J: ChangeJournal>(journal: &J) -> Result<JournalSession, SessionError> {
    let data = journal
        .query()
        .await
        .map_err(|e| SessionError::Unavailable(e.to_string()))?;
    JournalSession::from_data(&data).map_err(|e| SessionError::Unavailable(e.to_string()))
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
