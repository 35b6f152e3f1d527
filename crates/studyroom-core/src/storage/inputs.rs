//! JSON input files handed to the planner.
//!
//! Timetable: an array of raw sessions
//! (`{"subject", "day", "startAt", "endAt", "professor", "place"}`).
//! Subjects: an array of profiles (`{"name", "weight", "major", "priority"?}`).

use std::path::Path;

use crate::error::{CoreError, Result};
use crate::schedule::RawSession;
use crate::timeline::SubjectProfile;

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CoreError::Custom(format!("cannot read {}: {e}", path.display())))
}

/// Read raw timetable sessions from a JSON file.
pub fn load_raw_sessions(path: &Path) -> Result<Vec<RawSession>> {
    Ok(serde_json::from_str(&read(path)?)?)
}

/// Read subject profiles from a JSON file.
pub fn load_profiles(path: &Path) -> Result<Vec<SubjectProfile>> {
    Ok(serde_json::from_str(&read(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::PriorityLabel;

    #[test]
    fn reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let timetable = dir.path().join("timetable.json");
        let subjects = dir.path().join("subjects.json");
        std::fs::write(
            &timetable,
            r#"[{"subject":"Math","day":0,"startAt":"09:00","endAt":"10:30"}]"#,
        )
        .unwrap();
        std::fs::write(
            &subjects,
            r#"[{"name":"Math","weight":8,"major":true},{"name":"Art","priority":"low"}]"#,
        )
        .unwrap();

        let raw = load_raw_sessions(&timetable).unwrap();
        assert_eq!(raw[0].start_at, "09:00");

        let profiles = load_profiles(&subjects).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[1].weight, 1.0);
        assert_eq!(profiles[1].priority, Some(PriorityLabel::Low));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_raw_sessions(&dir.path().join("nope.json")),
            Err(CoreError::Custom(_))
        ));
    }
}
