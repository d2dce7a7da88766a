use crate::infra::{default_course_rules, InMemoryEventStore, InMemoryRoster};
use clap::Args;
use classroom_grades::error::AppError;
use classroom_grades::grading::{read_events, GradeService, GradeServiceError};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CSV export of the event log (sender, repo_name, completed_at_str,
    /// check_run_summary)
    #[arg(long)]
    pub(crate) events: PathBuf,
    /// Print one row per best attempt instead of per-student totals
    #[arg(long)]
    pub(crate) detailed: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let file = std::fs::File::open(&args.events)?;
    let events = read_events(file).map_err(AppError::from)?;

    let service = GradeService::new(
        Arc::new(InMemoryEventStore::with_events(events)),
        Arc::new(InMemoryRoster::default()),
        default_course_rules(),
    )
    .map_err(|err| AppError::from(GradeServiceError::from(err)))?;

    if args.detailed {
        println!(
            "{:<24} {:<26} {:>7} {:>9} {:>10}  {}",
            "student", "assignment", "points", "penalty", "adjusted", "completed"
        );
        for row in service.detailed()? {
            println!(
                "{:<24} {:<26} {:>3}/{:<3} {:>8}% {:>10.2}  {}",
                row.student,
                row.assignment,
                row.earned_points,
                row.max_points,
                row.penalty_percent,
                row.adjusted_points,
                row.completed_at
            );
        }
    } else {
        println!(
            "{:<24} {:<24} {:>10} {:>7} {:>8}",
            "student", "name", "total", "grade", "rounded"
        );
        for row in service.summary()? {
            println!(
                "{:<24} {:<24} {:>10.2} {:>7} {:>8}",
                row.student,
                row.display_name.as_deref().unwrap_or(""),
                row.total_points,
                row.grade,
                row.grade_rounded
            );
        }
    }

    Ok(())
}
