pub mod classify;
pub mod completions;
pub mod config;
pub mod free;
pub mod grid;
pub mod plan;

use std::path::{Path, PathBuf};

use chrono::Datelike;
use clap::Args;
use studyroom_core::storage::{load_profiles, load_raw_sessions};
use studyroom_core::timeline::prioritize;
use studyroom_core::{
    DayOfWeek, ManualOverride, SubjectPriority, Timetable, WeightRuleClassifier,
};

#[derive(Args)]
pub struct TimetableArg {
    /// JSON file with the week's class sessions
    #[arg(long, short = 't')]
    pub timetable: PathBuf,
}

#[derive(Args)]
pub struct SubjectsArg {
    /// JSON file with subject weights and optional priority labels
    #[arg(long, short = 's')]
    pub subjects: PathBuf,
}

/// Load and validate a timetable; bad sessions are skipped with a warning.
pub fn load_timetable(path: &Path) -> Result<Timetable, Box<dyn std::error::Error>> {
    let raw = load_raw_sessions(path)?;
    let report = Timetable::ingest(&raw);
    if !report.skipped.is_empty() {
        tracing::warn!(
            file = %path.display(),
            "skipped {} of {} session(s)",
            report.skipped.len(),
            raw.len()
        );
    }
    Ok(report.timetable)
}

/// Load subject profiles and label them, highest priority first.
pub fn load_subjects(path: &Path) -> Result<Vec<SubjectPriority>, Box<dyn std::error::Error>> {
    let profiles = load_profiles(path)?;
    Ok(prioritize(&ManualOverride::new(WeightRuleClassifier), &profiles))
}

/// Accepts a day name, a three-letter abbreviation, an index 0-6 or "today".
pub fn parse_day(s: &str) -> Result<DayOfWeek, String> {
    if s.eq_ignore_ascii_case("today") {
        return Ok(chrono::Local::now().weekday().into());
    }
    if let Some(day) = DayOfWeek::from_name(s) {
        return Ok(day);
    }
    s.parse::<u8>()
        .ok()
        .and_then(|i| DayOfWeek::from_index(i).ok())
        .ok_or_else(|| format!("unknown day: {s}"))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
