//! The grade pipeline: event normalization, penalty assessment, and
//! best-attempt aggregation, exposed through a service facade and HTTP router.
//!
//! The pipeline is stateless across invocations: every call re-reads the full
//! event history from the injected [`repository::EventStore`] and recomputes
//! the report from scratch, so concurrent calls never interfere.

pub mod aggregate;
pub mod course;
pub mod events;
pub mod normalizer;
pub mod penalty;
pub mod points;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::{best_attempts, DetailedRow, GradeReport, SummaryRow};
pub use course::{AssignmentIndex, AssignmentSpec, CourseRules, CourseRulesError, ForcedGrade};
pub use events::{read_events, RawEvent};
pub use normalizer::{normalize_event, normalize_events, SkipReason, Submission};
pub use penalty::Penalty;
pub use points::{parse_points, PointsParseError, PointsSummary};
pub use repository::{EventStore, EventStoreError, RosterDirectory, RosterError};
pub use router::grade_router;
pub use service::{GradeService, GradeServiceError};
