use std::collections::HashMap;

use super::events::RawEvent;

/// Read path into the append-only event log. Implementations are injected
/// into [`super::service::GradeService`] so the pipeline never owns a
/// process-wide connection.
pub trait EventStore: Send + Sync {
    /// Returns the full event history for this invocation. A failure here is
    /// fatal for the run: no partial report is produced.
    fn fetch_events(&self) -> Result<Vec<RawEvent>, EventStoreError>;
}

/// Event store failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventStoreError {
    #[error("event store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value directory mapping student logins to display names. The pipeline
/// only reads it for enrichment; the administrative endpoint writes it.
pub trait RosterDirectory: Send + Sync {
    fn display_names(&self, students: &[String]) -> Result<HashMap<String, String>, RosterError>;

    fn upsert_display_name(&self, student: &str, display_name: &str) -> Result<(), RosterError>;
}

/// Roster directory failure. Lookup failures are tolerated (blank names);
/// write failures surface to the administrative caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("roster directory unavailable: {0}")]
    Unavailable(String),
}
