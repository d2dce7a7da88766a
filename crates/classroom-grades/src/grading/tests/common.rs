use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::grading::course::{AssignmentIndex, AssignmentSpec, CourseRules};
use crate::grading::events::RawEvent;
use crate::grading::repository::{
    EventStore, EventStoreError, RosterDirectory, RosterError,
};
use crate::grading::service::GradeService;

pub(super) fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(h, min, s)
        .expect("valid time")
}

pub(super) fn assignment(id: &str, deadline: NaiveDateTime) -> AssignmentSpec {
    AssignmentSpec {
        id: id.to_string(),
        deadline,
    }
}

pub(super) fn course_rules() -> CourseRules {
    let february_deadline = ts(2025, 2, 11, 3, 5, 0);
    let may_deadline = ts(2025, 5, 22, 3, 5, 0);

    let mut allow_lists = HashMap::new();
    allow_lists.insert(
        "hw-rnn-attention".to_string(),
        HashSet::from(["hw-rnn-attention-alice".to_string()]),
    );

    CourseRules {
        assignments: vec![
            assignment("hw-activations", february_deadline),
            assignment("hw-weight-init", february_deadline),
            assignment("hw-rnn-attention", may_deadline),
        ],
        course_max_points: 30,
        allow_lists,
        penalty_overrides: HashMap::new(),
        forced_grades: Vec::new(),
    }
}

pub(super) fn rules_index(rules: &CourseRules) -> AssignmentIndex {
    AssignmentIndex::build(&rules.assignments).expect("test rules are unambiguous")
}

pub(super) fn event(sender: &str, repo: &str, completed_at: &str, summary: &str) -> RawEvent {
    RawEvent {
        sender: sender.to_string(),
        repo_name: repo.to_string(),
        completed_at: completed_at.to_string(),
        summary: summary.to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEventStore {
    events: Arc<Mutex<Vec<RawEvent>>>,
}

impl MemoryEventStore {
    pub(super) fn with_events(events: Vec<RawEvent>) -> Self {
        Self {
            events: Arc::new(Mutex::new(events)),
        }
    }
}

impl EventStore for MemoryEventStore {
    fn fetch_events(&self) -> Result<Vec<RawEvent>, EventStoreError> {
        Ok(self.events.lock().expect("event mutex poisoned").clone())
    }
}

pub(super) struct UnavailableEventStore;

impl EventStore for UnavailableEventStore {
    fn fetch_events(&self) -> Result<Vec<RawEvent>, EventStoreError> {
        Err(EventStoreError::Unavailable("event log offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRoster {
    names: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryRoster {
    pub(super) fn with_names(pairs: &[(&str, &str)]) -> Self {
        let names = pairs
            .iter()
            .map(|(student, name)| (student.to_string(), name.to_string()))
            .collect();
        Self {
            names: Arc::new(Mutex::new(names)),
        }
    }
}

impl RosterDirectory for MemoryRoster {
    fn display_names(&self, students: &[String]) -> Result<HashMap<String, String>, RosterError> {
        let guard = self.names.lock().expect("roster mutex poisoned");
        Ok(students
            .iter()
            .filter_map(|student| {
                guard
                    .get(student)
                    .map(|name| (student.clone(), name.clone()))
            })
            .collect())
    }

    fn upsert_display_name(&self, student: &str, display_name: &str) -> Result<(), RosterError> {
        self.names
            .lock()
            .expect("roster mutex poisoned")
            .insert(student.to_string(), display_name.to_string());
        Ok(())
    }
}

pub(super) struct UnavailableRoster;

impl RosterDirectory for UnavailableRoster {
    fn display_names(&self, _students: &[String]) -> Result<HashMap<String, String>, RosterError> {
        Err(RosterError::Unavailable("directory offline".to_string()))
    }

    fn upsert_display_name(&self, _student: &str, _display_name: &str) -> Result<(), RosterError> {
        Err(RosterError::Unavailable("directory offline".to_string()))
    }
}

pub(super) fn build_service(
    events: Vec<RawEvent>,
    rules: CourseRules,
) -> GradeService<MemoryEventStore, MemoryRoster> {
    GradeService::new(
        Arc::new(MemoryEventStore::with_events(events)),
        Arc::new(MemoryRoster::default()),
        rules,
    )
    .expect("test rules are unambiguous")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
