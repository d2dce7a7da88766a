use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::course::{AssignmentIndex, CourseRules};
use super::events::RawEvent;
use super::penalty::Penalty;
use super::points::{parse_points, PointsParseError};

/// Timestamp format used by the check-run completion feed.
const COMPLETED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Marker suffix on machine accounts; their re-runs are not submissions.
const BOT_SUFFIX: &str = "[bot]";

/// One graded attempt, fully typed and penalty-adjusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub student: String,
    pub assignment: String,
    pub earned_points: u32,
    pub max_points: u32,
    pub completed_at: NaiveDateTime,
    pub penalty: Penalty,
    pub adjusted_points: f64,
}

/// Why a raw event did not become a submission. Skips are logged and the run
/// continues; none of these surface to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("no grading summary reported yet")]
    EmptySummary,
    #[error("sender '{0}' is a bot account")]
    BotSender(String),
    #[error("unparsable points: {0}")]
    UnparsablePoints(#[from] PointsParseError),
    #[error("repository '{0}' matches no known assignment")]
    UnknownAssignment(String),
    #[error("repository '{0}' is not on the allow-list for '{1}'")]
    NotAllowListed(String, String),
    #[error("unparsable completion timestamp '{0}'")]
    BadTimestamp(String),
}

/// Converts one raw event into a submission, or explains why it was dropped.
pub fn normalize_event(
    event: &RawEvent,
    rules: &CourseRules,
    index: &AssignmentIndex,
) -> Result<Submission, SkipReason> {
    if event.summary.trim().is_empty() {
        return Err(SkipReason::EmptySummary);
    }

    if event.sender.ends_with(BOT_SUFFIX) {
        return Err(SkipReason::BotSender(event.sender.clone()));
    }

    let points = parse_points(&event.summary)?;

    let (assignment, student) = index
        .match_repo(&event.repo_name)
        .ok_or_else(|| SkipReason::UnknownAssignment(event.repo_name.clone()))?;

    if let Some(allowed) = rules.allow_lists.get(&assignment.id) {
        if !allowed.contains(&event.repo_name) {
            return Err(SkipReason::NotAllowListed(
                event.repo_name.clone(),
                assignment.id.clone(),
            ));
        }
    }

    let completed_at = NaiveDateTime::parse_from_str(&event.completed_at, COMPLETED_AT_FORMAT)
        .map_err(|_| SkipReason::BadTimestamp(event.completed_at.clone()))?;

    let penalty = match rules.penalty_overrides.get(&event.repo_name) {
        Some(days) => Penalty::from_days(*days),
        None => Penalty::assess(completed_at, assignment.deadline),
    };

    Ok(Submission {
        student,
        assignment: assignment.id.clone(),
        earned_points: points.earned,
        max_points: points.max,
        completed_at,
        penalty,
        adjusted_points: penalty.apply(points.earned),
    })
}

/// Normalizes a full event batch, logging each skip with its reason.
pub fn normalize_events(
    events: &[RawEvent],
    rules: &CourseRules,
    index: &AssignmentIndex,
) -> Vec<Submission> {
    let mut submissions = Vec::with_capacity(events.len());

    for event in events {
        match normalize_event(event, rules, index) {
            Ok(submission) => submissions.push(submission),
            Err(reason) => {
                debug!(repo = %event.repo_name, sender = %event.sender, %reason, "skipping event");
            }
        }
    }

    submissions
}
