use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use metrics_exporter_prometheus::PrometheusHandle;

use classroom_grades::grading::{
    AssignmentSpec, CourseRules, EventStore, EventStoreError, RawEvent, RosterDirectory,
    RosterError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Event log snapshot loaded at startup (e.g. from a CSV export of the
/// ingestion table). Every report call reads the full history.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEventStore {
    events: Arc<Mutex<Vec<RawEvent>>>,
}

impl InMemoryEventStore {
    pub(crate) fn with_events(events: Vec<RawEvent>) -> Self {
        Self {
            events: Arc::new(Mutex::new(events)),
        }
    }
}

impl EventStore for InMemoryEventStore {
    fn fetch_events(&self) -> Result<Vec<RawEvent>, EventStoreError> {
        Ok(self.events.lock().expect("event mutex poisoned").clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRoster {
    names: Arc<Mutex<HashMap<String, String>>>,
}

impl RosterDirectory for InMemoryRoster {
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

// The course table is static configuration; these literals are known valid.
fn deadline(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("course table date is valid")
        .and_hms_opt(h, min, 0)
        .expect("course table time is valid")
}

fn hw(id: &str, due: NaiveDateTime) -> AssignmentSpec {
    AssignmentSpec {
        id: id.to_string(),
        deadline: due,
    }
}

/// The current course: assignment deadlines, the submission-format allow-list
/// for the RNN homework, and the course-total denominator. Calendar deadlines
/// carry a one-day buffer over the published dates.
pub(crate) fn default_course_rules() -> CourseRules {
    let february = deadline(2025, 2, 11, 3, 5);
    let march = deadline(2025, 3, 13, 3, 5);
    let april = deadline(2025, 4, 17, 3, 5);
    let may = deadline(2025, 5, 22, 3, 5);
    let june = deadline(2025, 6, 23, 6, 5);

    let mut allow_lists = HashMap::new();
    allow_lists.insert(
        "hw-rnn-attention".to_string(),
        HashSet::from([
            "hw-rnn-attention-ababkova".to_string(),
            "hw-rnn-attention-dmpetrov".to_string(),
            "hw-rnn-attention-ekaterina-pavlova".to_string(),
            "hw-rnn-attention-grishin-aa".to_string(),
            "hw-rnn-attention-ivolkova".to_string(),
            "hw-rnn-attention-ksemenov".to_string(),
            "hw-rnn-attention-lmikhailova".to_string(),
            "hw-rnn-attention-nsokolov".to_string(),
            "hw-rnn-attention-osipov-dv".to_string(),
            "hw-rnn-attention-polinakuz".to_string(),
            "hw-rnn-attention-romanenko".to_string(),
            "hw-rnn-attention-ssmirnova".to_string(),
            "hw-rnn-attention-tkachev-m".to_string(),
            "hw-rnn-attention-vbelyaev".to_string(),
            "hw-rnn-attention-yufedorova".to_string(),
        ]),
    );

    CourseRules {
        assignments: vec![
            hw("hw-activations", february),
            hw("hw-weight-init", february),
            hw("hw-optimization", march),
            hw("hw-dropout", march),
            hw("hw-batchnorm", march),
            hw("hw-pytorch-basics", march),
            hw("hw-tokenization", april),
            hw("hw-rnn-attention", may),
            hw("hw-transformer-attention", may),
            hw("hw-llm-agent", june),
            hw("hw-vae", june),
            hw("hw-diffusion", june),
            hw("hw-multimodal-llm", june),
            hw("hw-letters", june),
        ],
        course_max_points: 1600,
        allow_lists,
        penalty_overrides: HashMap::new(),
        forced_grades: Vec::new(),
    }
}
