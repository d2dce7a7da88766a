use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;

use super::normalizer::Submission;

/// Key for the deduplication pass: one best attempt survives per pair.
pub type AttemptKey = (String, String);

/// Deduplicates repeated submissions, keeping for each (student, assignment)
/// pair the attempt with the highest adjusted score; ties go to the most
/// recent completion. The `BTreeMap` keeps downstream iteration (and thus the
/// rendered reports) deterministic.
pub fn best_attempts(submissions: Vec<Submission>) -> BTreeMap<AttemptKey, Submission> {
    let mut best: BTreeMap<AttemptKey, Submission> = BTreeMap::new();

    for candidate in submissions {
        let key = (candidate.student.clone(), candidate.assignment.clone());
        match best.get_mut(&key) {
            None => {
                best.insert(key, candidate);
            }
            Some(current) => {
                let ordering = candidate
                    .adjusted_points
                    .total_cmp(&current.adjusted_points)
                    .then_with(|| candidate.completed_at.cmp(&current.completed_at));
                if ordering == std::cmp::Ordering::Greater {
                    *current = candidate;
                }
            }
        }
    }

    best
}

/// One row of the summary view: a student's course total and derived grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub student: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub total_points: f64,
    pub grade: String,
    pub grade_rounded: u32,
}

/// One row of the detailed view: a single best attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedRow {
    pub student: String,
    pub assignment: String,
    pub earned_points: u32,
    pub max_points: u32,
    pub penalty_days: u8,
    pub penalty_percent: u8,
    pub adjusted_points: f64,
    pub completed_at: NaiveDateTime,
}

/// The deduplicated attempt set, renderable as either output mode.
#[derive(Debug, Clone, Default)]
pub struct GradeReport {
    best: BTreeMap<AttemptKey, Submission>,
}

impl GradeReport {
    pub fn from_submissions(submissions: Vec<Submission>) -> Self {
        Self {
            best: best_attempts(submissions),
        }
    }

    pub fn attempts(&self) -> impl Iterator<Item = &Submission> {
        self.best.values()
    }

    /// Detailed mode: every best attempt, ordered by student then assignment.
    pub fn detailed_rows(&self) -> Vec<DetailedRow> {
        self.best
            .values()
            .map(|attempt| DetailedRow {
                student: attempt.student.clone(),
                assignment: attempt.assignment.clone(),
                earned_points: attempt.earned_points,
                max_points: attempt.max_points,
                penalty_days: attempt.penalty.days,
                penalty_percent: attempt.penalty.percent,
                adjusted_points: attempt.adjusted_points,
                completed_at: attempt.completed_at,
            })
            .collect()
    }

    /// Summary mode: per-student totals normalized to a 10-point grade, with
    /// display names joined in where the roster resolved them.
    pub fn summary_rows(
        &self,
        display_names: &HashMap<String, String>,
        course_max_points: u32,
    ) -> Vec<SummaryRow> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for attempt in self.best.values() {
            *totals.entry(attempt.student.as_str()).or_insert(0.0) += attempt.adjusted_points;
        }

        totals
            .into_iter()
            .map(|(student, total_points)| {
                let grade_value = course_grade(total_points, course_max_points);
                // Round through the two-decimal representation, matching the
                // rendered grade string.
                let two_decimals = (grade_value * 100.0).round() / 100.0;
                SummaryRow {
                    student: student.to_string(),
                    display_name: display_names.get(student).cloned(),
                    total_points,
                    grade: format!("{grade_value:.2}"),
                    grade_rounded: (two_decimals + 0.5).floor() as u32,
                }
            })
            .collect()
    }
}

fn course_grade(total_points: f64, course_max_points: u32) -> f64 {
    if course_max_points == 0 {
        return 0.0;
    }
    (total_points / f64::from(course_max_points) * 10.0).min(10.0)
}
