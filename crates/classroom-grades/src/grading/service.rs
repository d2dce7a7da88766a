use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::aggregate::{DetailedRow, GradeReport, SummaryRow};
use super::course::{AssignmentIndex, CourseRules, CourseRulesError};
use super::normalizer::normalize_events;
use super::repository::{EventStore, EventStoreError, RosterDirectory, RosterError};

/// Facade composing the course rules with the injected event and roster
/// stores. Each report call re-derives everything from the full event
/// history; the service holds no mutable state.
pub struct GradeService<E, R> {
    events: Arc<E>,
    roster: Arc<R>,
    rules: CourseRules,
    index: AssignmentIndex,
}

impl<E, R> GradeService<E, R>
where
    E: EventStore + 'static,
    R: RosterDirectory + 'static,
{
    /// Validates the assignment table and builds the service. An ambiguous id
    /// set is rejected here, before any report can be produced.
    pub fn new(events: Arc<E>, roster: Arc<R>, rules: CourseRules) -> Result<Self, CourseRulesError> {
        let index = AssignmentIndex::build(&rules.assignments)?;
        Ok(Self {
            events,
            roster,
            rules,
            index,
        })
    }

    /// Summary mode: one row per student with total points and course grade,
    /// enriched with display names where the roster resolves them.
    pub fn summary(&self) -> Result<Vec<SummaryRow>, GradeServiceError> {
        let report = self.report()?;

        let students: Vec<String> = report
            .attempts()
            .map(|attempt| attempt.student.clone())
            .collect();
        let display_names = match self.roster.display_names(&students) {
            Ok(names) => names,
            Err(err) => {
                // Enrichment only; the report is still correct without names.
                warn!(%err, "roster lookup failed, leaving display names blank");
                HashMap::new()
            }
        };

        Ok(report.summary_rows(&display_names, self.rules.course_max_points))
    }

    /// Detailed mode: one row per best attempt.
    pub fn detailed(&self) -> Result<Vec<DetailedRow>, GradeServiceError> {
        Ok(self.report()?.detailed_rows())
    }

    /// Administrative write path for the roster directory.
    pub fn record_display_name(
        &self,
        student: &str,
        display_name: &str,
    ) -> Result<(), GradeServiceError> {
        self.roster.upsert_display_name(student, display_name)?;
        Ok(())
    }

    fn report(&self) -> Result<GradeReport, GradeServiceError> {
        let raw = self.events.fetch_events()?;
        debug!(events = raw.len(), "fetched event history");

        let mut submissions = normalize_events(&raw, &self.rules, &self.index);
        submissions.extend(
            self.rules
                .forced_grades
                .iter()
                .map(|forced| forced.to_submission()),
        );

        Ok(GradeReport::from_submissions(submissions))
    }
}

/// Error raised by the grade service.
#[derive(Debug, thiserror::Error)]
pub enum GradeServiceError {
    #[error(transparent)]
    Events(#[from] EventStoreError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Rules(#[from] CourseRulesError),
}
