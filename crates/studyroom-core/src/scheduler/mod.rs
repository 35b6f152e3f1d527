//! Weekly study allocator.
//!
//! Packs prioritized study time into each day's free intervals:
//! - Each subject asks for a daily target derived from its priority label
//! - Subjects are served strictly in priority order, first fit from the
//!   earliest uncommitted minute
//! - A day never gets more study time than it has free time
//! - A grant that runs past the end of a free interval continues in the next
//!   one, as a separate block

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schedule::{ClassSession, DayOfWeek, Timetable};
use crate::timeline::{
    minutes_to_hours, total_free_minutes, FreeInterval, FreeIntervalDeriver, PriorityLabel,
    SubjectPriority, TimeOfDay,
};

/// Whether a block reinforces a same-day class or prepares for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyKind {
    Review,
    Preview,
}

impl StudyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Preview => "preview",
        }
    }

    /// Suggested activities for a block of this kind.
    pub fn recommended_materials(&self) -> &'static [&'static str] {
        match self {
            Self::Review => &[
                "Summarize the lecture content",
                "Work through practice problems",
                "Check understanding of key concepts",
                "Prepare questions on unclear parts",
            ],
            Self::Preview => &[
                "Read the relevant textbook chapter",
                "Skim the lecture notes in advance",
                "Study the underlying concepts",
                "Try the worked examples",
            ],
        }
    }
}

/// A scheduled span of self-study for one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyBlock {
    pub subject: String,
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub kind: StudyKind,
    pub duration_hours: f64,
    pub priority: PriorityLabel,
}

impl StudyBlock {
    /// Get total duration in minutes
    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    pub fn overlaps(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.start < end && self.end > start
    }
}

/// Daily study target, in hours, per priority label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationTable {
    pub very_high: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
    pub very_low: f64,
}

impl DurationTable {
    pub fn hours(&self, label: PriorityLabel) -> f64 {
        match label {
            PriorityLabel::VeryHigh => self.very_high,
            PriorityLabel::High => self.high,
            PriorityLabel::Medium => self.medium,
            PriorityLabel::Low => self.low,
            PriorityLabel::VeryLow => self.very_low,
        }
    }

    /// Target in whole minutes; negative or NaN hours count as zero.
    pub fn target_minutes(&self, label: PriorityLabel) -> u32 {
        let minutes = (self.hours(label) * 60.0).round();
        if minutes.is_nan() || minutes <= 0.0 {
            0
        } else {
            minutes.min(f64::from(u32::MAX)) as u32
        }
    }
}

impl Default for DurationTable {
    fn default() -> Self {
        Self {
            very_high: 3.0,
            high: 2.5,
            medium: 2.0,
            low: 1.5,
            very_low: 1.0,
        }
    }
}

/// Allocator configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub targets: DurationTable,
    /// Cap on study minutes per day, below the free total
    pub max_daily_minutes: Option<u32>,
    /// Allocation granularity; blocks start and end on multiples of this
    /// counted from `slot_origin` (1 = minute precision)
    pub slot_minutes: u32,
    /// A time on the slot lattice, normally the grid window start
    pub slot_origin: TimeOfDay,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            targets: DurationTable::default(),
            max_daily_minutes: None,
            slot_minutes: 30,
            slot_origin: TimeOfDay::MIDNIGHT,
        }
    }
}

impl SchedulerConfig {
    fn slot(&self) -> u32 {
        self.slot_minutes.max(1)
    }

    /// Round `minutes` down to a whole number of slots.
    fn floor_slots(&self, minutes: u32) -> u32 {
        minutes / self.slot() * self.slot()
    }

    /// Shrink each interval to the slot lattice, dropping those left empty.
    fn snap(&self, free: &[FreeInterval]) -> Vec<FreeInterval> {
        let slot = self.slot();
        if slot == 1 {
            return free.to_vec();
        }
        let shift = self.slot_origin.minutes() % slot;
        let up = |m: u32| {
            if m <= shift {
                shift
            } else {
                shift + (m - shift).div_ceil(slot) * slot
            }
        };
        let down = |m: u32| (m >= shift).then(|| shift + (m - shift) / slot * slot);

        free.iter()
            .filter_map(|i| {
                let start = TimeOfDay::from_minutes(up(i.start.minutes()))?;
                let end = TimeOfDay::from_minutes(down(i.end.minutes())?)?;
                FreeInterval::new(i.day, start, end)
            })
            .collect()
    }
}

/// One day's allocation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub day: DayOfWeek,
    pub free_intervals: Vec<FreeInterval>,
    pub blocks: Vec<StudyBlock>,
    pub budget_minutes: u32,
    pub allocated_minutes: u32,
}

impl DayPlan {
    pub fn free_minutes(&self) -> u32 {
        total_free_minutes(&self.free_intervals)
    }

    pub fn allocated_hours(&self) -> f64 {
        minutes_to_hours(self.allocated_minutes)
    }

    /// Minutes granted to `subject` on this day, across split blocks.
    pub fn minutes_for(&self, subject: &str) -> u32 {
        self.blocks
            .iter()
            .filter(|b| b.subject == subject)
            .map(StudyBlock::duration_minutes)
            .sum()
    }
}

/// Counts reported alongside a weekly plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlanSummary {
    pub total_subjects: usize,
    pub major_subjects: usize,
    pub high_priority_subjects: usize,
}

impl PlanSummary {
    pub fn from_subjects(subjects: &[SubjectPriority]) -> Self {
        Self {
            total_subjects: subjects.len(),
            major_subjects: subjects.iter().filter(|s| s.is_major).count(),
            high_priority_subjects: subjects
                .iter()
                .filter(|s| s.priority_label.is_high())
                .count(),
        }
    }
}

/// A full week of day plans, Monday first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPlan {
    pub days: Vec<DayPlan>,
    pub summary: PlanSummary,
}

impl WeeklyPlan {
    pub fn day(&self, day: DayOfWeek) -> Option<&DayPlan> {
        self.days.iter().find(|p| p.day == day)
    }

    /// Every block of the week in day then start order.
    pub fn blocks(&self) -> impl Iterator<Item = &StudyBlock> {
        self.days.iter().flat_map(|p| p.blocks.iter())
    }

    pub fn total_allocated_minutes(&self) -> u32 {
        self.days.iter().map(|p| p.allocated_minutes).sum()
    }
}

/// Greedy priority-first study allocator
pub struct WeeklyAllocator {
    config: SchedulerConfig,
}

impl WeeklyAllocator {
    /// Create a new allocator with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Allocate one day.
    ///
    /// # Arguments
    /// * `day` - Day being planned
    /// * `subjects` - Subjects, most urgent first
    /// * `free` - The day's free intervals, sorted and disjoint
    /// * `classes` - Class sessions; only those on `day` decide review vs preview
    ///
    /// Only whole slots are handed out: each interval is shrunk to the slot
    /// lattice and every grant is a multiple of the slot length.
    pub fn allocate_day(
        &self,
        day: DayOfWeek,
        subjects: &[SubjectPriority],
        free: &[FreeInterval],
        classes: &[ClassSession],
    ) -> DayPlan {
        let usable = self.config.snap(free);
        let usable_total = total_free_minutes(&usable);
        let budget = match self.config.max_daily_minutes {
            Some(cap) => usable_total.min(self.config.floor_slots(cap)),
            None => usable_total,
        };

        let mut blocks = Vec::new();
        let mut allocated = 0u32;
        let mut cursor = Cursor::new(&usable);

        for subject in subjects {
            let available = budget.saturating_sub(allocated);
            if available == 0 {
                tracing::debug!(%day, subject = %subject.subject, "no free time left");
                break;
            }

            let want = self.config.targets.target_minutes(subject.priority_label);
            let grant = self.config.floor_slots(want).min(available);
            if grant == 0 {
                continue;
            }

            let kind = if classes
                .iter()
                .any(|c| c.day == day && c.subject == subject.subject)
            {
                StudyKind::Review
            } else {
                StudyKind::Preview
            };

            for (start, end) in cursor.take(grant) {
                blocks.push(StudyBlock {
                    subject: subject.subject.clone(),
                    day,
                    start,
                    end,
                    kind,
                    duration_hours: minutes_to_hours(start.minutes_until(end)),
                    priority: subject.priority_label,
                });
            }
            allocated += grant;
        }

        tracing::debug!(
            %day,
            budget,
            allocated,
            blocks = blocks.len(),
            "allocated study time"
        );

        DayPlan {
            day,
            free_intervals: free.to_vec(),
            blocks,
            budget_minutes: budget,
            allocated_minutes: allocated,
        }
    }

    /// Allocate every day of the week from precomputed free intervals.
    ///
    /// Days missing from `free_by_day` are treated as having no free time.
    pub fn allocate_week(
        &self,
        subjects: &[SubjectPriority],
        free_by_day: &BTreeMap<DayOfWeek, Vec<FreeInterval>>,
        timetable: &Timetable,
    ) -> WeeklyPlan {
        let days = DayOfWeek::ALL
            .into_iter()
            .map(|day| {
                let free = free_by_day.get(&day).map(Vec::as_slice).unwrap_or(&[]);
                self.allocate_day(day, subjects, free, timetable.sessions())
            })
            .collect();

        WeeklyPlan {
            days,
            summary: PlanSummary::from_subjects(subjects),
        }
    }

    /// Derive free intervals with `deriver`, then allocate the week.
    pub fn plan(
        &self,
        deriver: &FreeIntervalDeriver,
        timetable: &Timetable,
        subjects: &[SubjectPriority],
    ) -> WeeklyPlan {
        let free_by_day = deriver.derive_week(timetable);
        self.allocate_week(subjects, &free_by_day, timetable)
    }
}

impl Default for WeeklyAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a day's free intervals as one continuous timeline.
struct Cursor<'a> {
    intervals: &'a [FreeInterval],
    index: usize,
    at: Option<TimeOfDay>,
}

impl<'a> Cursor<'a> {
    fn new(intervals: &'a [FreeInterval]) -> Self {
        Self {
            intervals,
            index: 0,
            at: intervals.first().map(|i| i.start),
        }
    }

    /// Commit up to `minutes`, one span per interval touched.
    fn take(&mut self, mut minutes: u32) -> Vec<(TimeOfDay, TimeOfDay)> {
        let mut spans = Vec::new();

        while minutes > 0 {
            let (Some(interval), Some(at)) = (self.intervals.get(self.index), self.at) else {
                break;
            };

            let room = at.minutes_until(interval.end);
            if room == 0 {
                self.index += 1;
                self.at = self.intervals.get(self.index).map(|i| i.start);
                continue;
            }

            let step = minutes.min(room);
            let end = if step == room {
                interval.end
            } else {
                at.add_minutes(step).unwrap_or(interval.end)
            };

            spans.push((at, end));
            self.at = Some(end);
            minutes -= step;
        }

        spans
    }
}
