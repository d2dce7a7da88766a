use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::normalizer::Submission;
use super::penalty::Penalty;

/// Separator between the assignment prefix and the student login in a
/// Classroom repository name (`hw-activations-alice`).
pub const REPO_SEPARATOR: char = '-';

/// One homework unit: a fixed string id and a deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSpec {
    pub id: String,
    pub deadline: NaiveDateTime,
}

/// Administrative grade override: appended to the submission pool before
/// deduplication, competing with organic submissions for the best attempt.
/// `recorded_at` is fixed in configuration so reruns stay byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcedGrade {
    pub student: String,
    pub assignment: String,
    pub earned_points: u32,
    pub max_points: u32,
    pub recorded_at: NaiveDateTime,
}

impl ForcedGrade {
    pub fn to_submission(&self) -> Submission {
        Submission {
            student: self.student.clone(),
            assignment: self.assignment.clone(),
            earned_points: self.earned_points,
            max_points: self.max_points,
            completed_at: self.recorded_at,
            penalty: Penalty::none(),
            adjusted_points: f64::from(self.earned_points),
        }
    }
}

/// Static, configuration-supplied course table: assignments and deadlines,
/// per-assignment allow-lists, per-repo penalty overrides, forced grades, and
/// the denominator used to normalize course totals into a 10-point grade.
#[derive(Debug, Clone, Default)]
pub struct CourseRules {
    pub assignments: Vec<AssignmentSpec>,
    pub course_max_points: u32,
    /// assignment id -> full repository names accepted for it
    pub allow_lists: HashMap<String, HashSet<String>>,
    /// repository name -> forced penalty days, overriding the computed tier
    pub penalty_overrides: HashMap<String, u8>,
    pub forced_grades: Vec<ForcedGrade>,
}

/// Configuration invariant violations. Any of these make repository-name
/// matching ambiguous, so they abort the run before a report is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseRulesError {
    #[error("assignment id '{shorter}' is a prefix of '{longer}'")]
    AmbiguousIds { shorter: String, longer: String },
    #[error("assignment id '{0}' is declared twice")]
    DuplicateId(String),
}

/// Longest-prefix matcher over the known assignment ids, built once per
/// service with the ids sorted by length descending (ties by id ascending).
#[derive(Debug, Clone)]
pub struct AssignmentIndex {
    ordered: Vec<AssignmentSpec>,
}

impl AssignmentIndex {
    /// Validates the id set and builds the matcher. Rejects duplicate ids and
    /// any pair where one id prefixes the other.
    pub fn build(assignments: &[AssignmentSpec]) -> Result<Self, CourseRulesError> {
        let mut ordered = assignments.to_vec();
        ordered.sort_by(|a, b| b.id.len().cmp(&a.id.len()).then_with(|| a.id.cmp(&b.id)));

        for (i, spec) in ordered.iter().enumerate() {
            for other in &ordered[i + 1..] {
                if spec.id == other.id {
                    return Err(CourseRulesError::DuplicateId(spec.id.clone()));
                }
                // `ordered` is length-descending, so only `other` can be the prefix.
                if spec.id.starts_with(other.id.as_str()) {
                    return Err(CourseRulesError::AmbiguousIds {
                        shorter: other.id.clone(),
                        longer: spec.id.clone(),
                    });
                }
            }
        }

        Ok(Self { ordered })
    }

    /// Matches a repository name to its assignment and student login: the
    /// longest id that prefixes the name, followed by the separator and a
    /// non-empty remainder.
    pub fn match_repo<'a>(&'a self, repo_name: &str) -> Option<(&'a AssignmentSpec, String)> {
        for spec in &self.ordered {
            if let Some(rest) = repo_name.strip_prefix(spec.id.as_str()) {
                if let Some(student) = rest.strip_prefix(REPO_SEPARATOR) {
                    if !student.is_empty() {
                        return Some((spec, student.to_string()));
                    }
                }
            }
        }
        None
    }
}
