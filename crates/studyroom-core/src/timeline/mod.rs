//! Time arithmetic, free-interval detection and subject priorities.
//!
//! This module provides:
//! - `HH:MM` parsing and formatting over minute-of-day values
//! - Free interval derivation between class sessions
//! - Priority labels and the classifier capability

mod clock;
mod gap;
mod priority;

pub use clock::{
    format_time, minutes_to_hours, parse_time, DayWindow, TimeOfDay, MINUTES_PER_DAY,
};
pub use gap::{
    derive_free_intervals, total_free_minutes, FreeInterval, FreeIntervalDeriver, GapSize,
};
pub use priority::{
    prioritize, sort_by_priority, Classification, ManualOverride, PriorityClassifier,
    PriorityLabel, SubjectPriority, SubjectProfile, UnknownPriorityLabel, WeightRuleClassifier,
};
