use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

/// One row of ingested webhook data: a CI check-run completion as recorded by
/// the ingestion function. Timestamps stay raw strings here; the normalizer
/// owns parsing and rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub sender: String,
    pub repo_name: String,
    #[serde(rename = "completed_at_str")]
    pub completed_at: String,
    #[serde(
        rename = "check_run_summary",
        default,
        deserialize_with = "empty_string_as_empty"
    )]
    pub summary: String,
}

/// Reads an event-log CSV export (columns matching the ingestion table:
/// `sender`, `repo_name`, `completed_at_str`, `check_run_summary`).
pub fn read_events<R: Read>(reader: R) -> Result<Vec<RawEvent>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut events = Vec::new();

    for record in csv_reader.deserialize::<RawEvent>() {
        events.push(record?);
    }

    Ok(events)
}

fn empty_string_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
