//! Free-interval derivation between class sessions.
//!
//! Finds the spans of a daily window that no class occupies. Overlapping and
//! out-of-window sessions are handled by clipping; the result for each day is
//! sorted and pairwise disjoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::clock::{DayWindow, TimeOfDay};
use crate::schedule::{ClassSession, DayOfWeek, Timetable};

/// Size category of a free interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapSize {
    Short,  // under 60 minutes
    Medium, // 60-119 minutes
    Long,   // 120+ minutes
}

impl GapSize {
    /// Categorize an interval by its duration in minutes
    pub fn from_minutes(minutes: u32) -> Self {
        if minutes < 60 {
            Self::Short
        } else if minutes < 120 {
            Self::Medium
        } else {
            Self::Long
        }
    }
}

/// A span of a day with no class in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeInterval {
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl FreeInterval {
    /// Create an interval; `None` unless `start < end`.
    pub fn new(day: DayOfWeek, start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        (start < end).then_some(Self { day, start, end })
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    pub fn size(&self) -> GapSize {
        GapSize::from_minutes(self.duration_minutes())
    }

    /// Check if this interval can fit a block of given duration
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration_minutes() >= minutes
    }

    /// True if `[start, end)` lies entirely inside this interval.
    pub fn contains(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.start <= start && end <= self.end
    }
}

/// Derives free intervals for a bounding daily window.
#[derive(Debug, Clone)]
pub struct FreeIntervalDeriver {
    window: DayWindow,
    /// Intervals shorter than this are dropped (0 keeps everything)
    min_free_minutes: u32,
}

impl FreeIntervalDeriver {
    /// Create a deriver for `window` that keeps every interval.
    pub fn new(window: DayWindow) -> Self {
        Self {
            window,
            min_free_minutes: 0,
        }
    }

    /// Set the minimum interval duration
    pub fn with_min_gap(mut self, minutes: u32) -> Self {
        self.min_free_minutes = minutes;
        self
    }

    pub fn window(&self) -> DayWindow {
        self.window
    }

    /// Free intervals for one day.
    ///
    /// `sessions` may contain other days' sessions; only those on `day` are
    /// considered. Sessions sharing a start time keep their input order.
    pub fn derive<'a, I>(&self, day: DayOfWeek, sessions: I) -> Vec<FreeInterval>
    where
        I: IntoIterator<Item = &'a ClassSession>,
    {
        let window = self.window;

        let mut relevant: Vec<&ClassSession> = sessions
            .into_iter()
            .filter(|s| s.day == day && window.overlaps(s.start, s.end))
            .collect();
        // Vec::sort_by_key is stable.
        relevant.sort_by_key(|s| s.start);

        if relevant.is_empty() {
            return self.keep(vec![FreeInterval {
                day,
                start: window.start,
                end: window.end,
            }]);
        }

        let mut intervals = Vec::new();
        let mut cursor = window.start;

        for session in relevant {
            let seg_start = session.start.max(window.start);
            let seg_end = session.end.min(window.end);

            if seg_start > cursor {
                intervals.push(FreeInterval {
                    day,
                    start: cursor,
                    end: seg_start,
                });
            }
            cursor = cursor.max(seg_end);
        }

        if cursor < window.end {
            intervals.push(FreeInterval {
                day,
                start: cursor,
                end: window.end,
            });
        }

        self.keep(intervals)
    }

    /// Free intervals for every day of the week, Monday first.
    pub fn derive_week(&self, timetable: &Timetable) -> BTreeMap<DayOfWeek, Vec<FreeInterval>> {
        DayOfWeek::ALL
            .into_iter()
            .map(|day| (day, self.derive(day, timetable.sessions())))
            .collect()
    }

    fn keep(&self, intervals: Vec<FreeInterval>) -> Vec<FreeInterval> {
        if self.min_free_minutes == 0 {
            return intervals;
        }
        intervals
            .into_iter()
            .filter(|i| i.can_fit(self.min_free_minutes))
            .collect()
    }
}

impl Default for FreeIntervalDeriver {
    fn default() -> Self {
        Self::new(DayWindow::default())
    }
}

/// Convenience function to derive one day's intervals with default settings
pub fn derive_free_intervals(
    day: DayOfWeek,
    sessions: &[ClassSession],
    window: DayWindow,
) -> Vec<FreeInterval> {
    FreeIntervalDeriver::new(window).derive(day, sessions)
}

/// Total free minutes across `intervals`.
pub fn total_free_minutes(intervals: &[FreeInterval]) -> u32 {
    intervals.iter().map(FreeInterval::duration_minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn class(day: DayOfWeek, start: &str, end: &str) -> ClassSession {
        ClassSession::try_new("Class", day, t(start), t(end)).unwrap()
    }

    fn spans(intervals: &[FreeInterval]) -> Vec<(String, String)> {
        intervals
            .iter()
            .map(|i| (i.start.to_string(), i.end.to_string()))
            .collect()
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_gap_size_classification() {
        assert_eq!(GapSize::from_minutes(30), GapSize::Short);
        assert_eq!(GapSize::from_minutes(60), GapSize::Medium);
        assert_eq!(GapSize::from_minutes(119), GapSize::Medium);
        assert_eq!(GapSize::from_minutes(120), GapSize::Long);
    }

    #[test]
    fn class_at_window_start_leaves_single_trailing_interval() {
        let sessions = vec![class(DayOfWeek::Monday, "09:00", "10:30")];
        let free = derive_free_intervals(DayOfWeek::Monday, &sessions, DayWindow::default());
        assert_eq!(spans(&free), vec![pair("10:30", "21:00")]);
    }

    #[test]
    fn no_classes_yields_whole_window_each_day() {
        let week = FreeIntervalDeriver::default().derive_week(&Timetable::default());
        assert_eq!(week.len(), 7);
        for (day, free) in &week {
            assert_eq!(free.len(), 1);
            assert_eq!(free[0].day, *day);
            assert_eq!(free[0].duration_minutes(), 12 * 60);
        }
    }

    #[test]
    fn class_straddling_window_start_is_clipped() {
        let sessions = vec![class(DayOfWeek::Tuesday, "08:00", "09:30")];
        let free = derive_free_intervals(DayOfWeek::Tuesday, &sessions, DayWindow::default());
        assert_eq!(spans(&free), vec![pair("09:30", "21:00")]);
    }

    #[test]
    fn class_containing_window_leaves_nothing() {
        let sessions = vec![class(DayOfWeek::Monday, "08:00", "22:00")];
        let free = derive_free_intervals(DayOfWeek::Monday, &sessions, DayWindow::default());
        assert!(free.is_empty());
    }

    #[test]
    fn back_to_back_and_overlapping_classes() {
        let sessions = vec![
            class(DayOfWeek::Monday, "13:00", "14:00"),
            class(DayOfWeek::Monday, "10:00", "11:00"),
            class(DayOfWeek::Monday, "11:00", "12:00"),
            class(DayOfWeek::Monday, "13:30", "15:00"),
            class(DayOfWeek::Monday, "20:30", "23:00"),
        ];
        let free = derive_free_intervals(DayOfWeek::Monday, &sessions, DayWindow::default());
        assert_eq!(
            spans(&free),
            vec![
                pair("09:00", "10:00"),
                pair("12:00", "13:00"),
                pair("15:00", "20:30"),
            ]
        );
    }

    #[test]
    fn sessions_outside_window_or_other_days_are_ignored() {
        let sessions = vec![
            class(DayOfWeek::Monday, "07:00", "08:30"),
            class(DayOfWeek::Monday, "21:00", "22:00"),
            class(DayOfWeek::Tuesday, "10:00", "12:00"),
        ];
        let free = derive_free_intervals(DayOfWeek::Monday, &sessions, DayWindow::default());
        assert_eq!(spans(&free), vec![pair("09:00", "21:00")]);
    }

    #[test]
    fn min_gap_filter() {
        let sessions = vec![
            class(DayOfWeek::Monday, "09:30", "12:00"),
            class(DayOfWeek::Monday, "12:45", "20:00"),
        ];
        let free = FreeIntervalDeriver::default()
            .with_min_gap(60)
            .derive(DayOfWeek::Monday, &sessions);
        assert_eq!(spans(&free), vec![pair("20:00", "21:00")]);
    }

    fn arb_sessions() -> impl Strategy<Value = Vec<ClassSession>> {
        prop::collection::vec((0u32..1439, 1u32..300), 0..12).prop_map(|raw| {
            raw.into_iter()
                .filter_map(|(start, len)| {
                    let start = TimeOfDay::from_minutes(start)?;
                    let end = TimeOfDay::from_minutes((start.minutes() + len).min(1439))?;
                    ClassSession::try_new("P", DayOfWeek::Wednesday, start, end).ok()
                })
                .collect()
        })
    }

    /// Minutes of the window covered by at least one session.
    fn covered_minutes(sessions: &[ClassSession], window: DayWindow) -> u32 {
        (window.start.minutes()..window.end.minutes())
            .filter(|&m| {
                sessions
                    .iter()
                    .any(|s| s.start.minutes() <= m && m < s.end.minutes())
            })
            .count() as u32
    }

    proptest! {
        #[test]
        fn free_and_class_time_partition_window(sessions in arb_sessions()) {
            let window = DayWindow::default();
            let free = derive_free_intervals(DayOfWeek::Wednesday, &sessions, window);
            prop_assert_eq!(
                total_free_minutes(&free) + covered_minutes(&sessions, window),
                window.duration_minutes()
            );
        }

        #[test]
        fn intervals_sorted_disjoint_and_non_empty(sessions in arb_sessions()) {
            let free = derive_free_intervals(DayOfWeek::Wednesday, &sessions, DayWindow::default());
            for interval in &free {
                prop_assert!(interval.start < interval.end);
            }
            for pair in free.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
        }

        #[test]
        fn intervals_never_overlap_classes(sessions in arb_sessions()) {
            let free = derive_free_intervals(DayOfWeek::Wednesday, &sessions, DayWindow::default());
            for interval in &free {
                for s in &sessions {
                    prop_assert!(!(s.start < interval.end && s.end > interval.start));
                }
            }
        }
    }
}
