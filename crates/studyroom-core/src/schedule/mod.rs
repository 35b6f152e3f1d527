//! Schedule types: days of the week, class sessions and the weekly timetable.
//!
//! Raw sessions handed over by the timetable collaborator are converted here;
//! malformed entries are skipped and reported, never fatal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScheduleError;
use crate::timeline::TimeOfDay;

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days in display order.
    pub const ALL: [DayOfWeek; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Map a 0-based index (0=Mon ... 6=Sun) to a day.
    ///
    /// # Errors
    /// Returns [`ScheduleError::UnknownDay`] for indexes above 6.
    pub fn from_index(index: u8) -> Result<Self, ScheduleError> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(ScheduleError::UnknownDay(index))
    }

    /// 0-based index, Monday = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Case-insensitive lookup by English name or three-letter abbreviation.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|day| {
            let full = day.as_str().to_ascii_lowercase();
            lower == full || (lower.len() == 3 && full.starts_with(&lower))
        })
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(value: chrono::Weekday) -> Self {
        Self::ALL[value.num_days_from_monday() as usize]
    }
}

impl From<DayOfWeek> for chrono::Weekday {
    fn from(value: DayOfWeek) -> Self {
        match value {
            DayOfWeek::Monday => chrono::Weekday::Mon,
            DayOfWeek::Tuesday => chrono::Weekday::Tue,
            DayOfWeek::Wednesday => chrono::Weekday::Wed,
            DayOfWeek::Thursday => chrono::Weekday::Thu,
            DayOfWeek::Friday => chrono::Weekday::Fri,
            DayOfWeek::Saturday => chrono::Weekday::Sat,
            DayOfWeek::Sunday => chrono::Weekday::Sun,
        }
    }
}

/// A weekly recurring class. Only built through [`ClassSession::try_new`] or
/// [`RawSession::to_session`], so `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSession {
    pub subject: String,
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub professor: String,
    pub place: String,
}

impl ClassSession {
    /// Create a session.
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidTimeRange`] if `end <= start`.
    pub fn try_new(
        subject: impl Into<String>,
        day: DayOfWeek,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, ScheduleError> {
        if end <= start {
            return Err(ScheduleError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            subject: subject.into(),
            day,
            start,
            end,
            professor: String::new(),
            place: String::new(),
        })
    }

    pub fn with_professor(mut self, professor: impl Into<String>) -> Self {
        self.professor = professor.into();
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }
}

/// A session as delivered by the timetable source, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSession {
    pub subject: String,
    /// 0=Monday ... 6=Sunday
    pub day: u8,
    #[serde(rename = "startAt", alias = "start")]
    pub start_at: String,
    #[serde(rename = "endAt", alias = "end")]
    pub end_at: String,
    #[serde(default)]
    pub professor: String,
    #[serde(default)]
    pub place: String,
}

impl RawSession {
    /// Validate and convert into a [`ClassSession`].
    pub fn to_session(&self) -> Result<ClassSession, ScheduleError> {
        let day = DayOfWeek::from_index(self.day)?;
        let start = TimeOfDay::parse(&self.start_at)?;
        let end = TimeOfDay::parse(&self.end_at)?;
        Ok(ClassSession::try_new(self.subject.clone(), day, start, end)?
            .with_professor(self.professor.clone())
            .with_place(self.place.clone()))
    }
}

/// A raw session that was left out of the timetable, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSession {
    pub subject: String,
    pub position: usize,
    pub error: ScheduleError,
}

/// Result of ingesting raw sessions.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub timetable: Timetable,
    pub skipped: Vec<SkippedSession>,
}

/// The validated weekly class timetable, in ingestion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timetable {
    sessions: Vec<ClassSession>,
}

impl Timetable {
    pub fn new(sessions: Vec<ClassSession>) -> Self {
        Self { sessions }
    }

    /// Build a timetable from raw sessions, keeping the well-formed subset.
    pub fn ingest(raw: &[RawSession]) -> IngestReport {
        let mut sessions = Vec::with_capacity(raw.len());
        let mut skipped = Vec::new();

        for (position, entry) in raw.iter().enumerate() {
            match entry.to_session() {
                Ok(session) => sessions.push(session),
                Err(error) => {
                    tracing::warn!(
                        subject = %entry.subject,
                        day = entry.day,
                        start = %entry.start_at,
                        end = %entry.end_at,
                        %error,
                        "skipping class session"
                    );
                    skipped.push(SkippedSession {
                        subject: entry.subject.clone(),
                        position,
                        error,
                    });
                }
            }
        }

        IngestReport {
            timetable: Self::new(sessions),
            skipped,
        }
    }

    pub fn sessions(&self) -> &[ClassSession] {
        &self.sessions
    }

    /// Sessions on `day`, in ingestion order.
    pub fn sessions_on(&self, day: DayOfWeek) -> Vec<&ClassSession> {
        self.sessions.iter().filter(|s| s.day == day).collect()
    }

    /// True if `subject` has any class on `day`.
    pub fn has_class(&self, subject: &str, day: DayOfWeek) -> bool {
        self.sessions
            .iter()
            .any(|s| s.day == day && s.subject == subject)
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimeParseError;

    fn raw(subject: &str, day: u8, start: &str, end: &str) -> RawSession {
        RawSession {
            subject: subject.to_string(),
            day,
            start_at: start.to_string(),
            end_at: end.to_string(),
            professor: String::new(),
            place: String::new(),
        }
    }

    #[test]
    fn day_order_and_index() {
        assert!(DayOfWeek::Monday < DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::from_index(0), Ok(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::from_index(6), Ok(DayOfWeek::Sunday));
        assert_eq!(DayOfWeek::from_index(7), Err(ScheduleError::UnknownDay(7)));
        assert_eq!(DayOfWeek::Friday.index(), 4);
    }

    #[test]
    fn day_names_and_chrono() {
        assert_eq!(DayOfWeek::from_name("wed"), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::from_name("Saturday"), Some(DayOfWeek::Saturday));
        assert_eq!(DayOfWeek::from_name("someday"), None);
        assert_eq!(DayOfWeek::from(chrono::Weekday::Sun), DayOfWeek::Sunday);
        assert_eq!(chrono::Weekday::from(DayOfWeek::Tuesday), chrono::Weekday::Tue);
    }

    #[test]
    fn session_rejects_inverted_range() {
        let t = TimeOfDay::from_hm(10, 0).unwrap();
        assert!(ClassSession::try_new("Math", DayOfWeek::Monday, t, t).is_err());
    }

    #[test]
    fn ingest_keeps_well_formed_subset() {
        let report = Timetable::ingest(&[
            raw("Math", 0, "09:00", "10:30"),
            raw("Physics", 1, "9:5", "11:00"),
            raw("Chem", 2, "14:00", "13:00"),
            raw("Bio", 9, "10:00", "11:00"),
            raw("Art", 4, "13:00", "15:00"),
        ]);

        let subjects: Vec<_> = report
            .timetable
            .sessions()
            .iter()
            .map(|s| s.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["Math", "Art"]);

        assert_eq!(report.skipped.len(), 3);
        assert_eq!(report.skipped[0].position, 1);
        assert_eq!(
            report.skipped[0].error,
            ScheduleError::Parse(TimeParseError::BadWidth("9:5".to_string()))
        );
        assert!(matches!(
            report.skipped[1].error,
            ScheduleError::InvalidTimeRange { .. }
        ));
        assert_eq!(report.skipped[2].error, ScheduleError::UnknownDay(9));
    }

    #[test]
    fn raw_session_json_shape() {
        let json = r#"{"subject":"Math","day":0,"startAt":"09:00","endAt":"10:30","professor":"Kim","place":"B101"}"#;
        let raw: RawSession = serde_json::from_str(json).unwrap();
        let session = raw.to_session().unwrap();
        assert_eq!(session.professor, "Kim");
        assert_eq!(session.duration_minutes(), 90);
    }

    #[test]
    fn has_class_lookup() {
        let report = Timetable::ingest(&[raw("Math", 0, "09:00", "10:00")]);
        assert!(report.timetable.has_class("Math", DayOfWeek::Monday));
        assert!(!report.timetable.has_class("Math", DayOfWeek::Tuesday));
        assert_eq!(report.timetable.sessions_on(DayOfWeek::Monday).len(), 1);
    }
}
