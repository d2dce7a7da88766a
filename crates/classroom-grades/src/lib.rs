//! Grade aggregation for a GitHub Classroom course: normalizes CI-completion
//! events into submissions, applies deadline penalties, and rolls the best
//! attempt per student and assignment into a course grade report.

pub mod config;
pub mod error;
pub mod grading;
pub mod telemetry;
