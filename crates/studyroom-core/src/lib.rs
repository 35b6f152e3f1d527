//! # Studyroom Core Library
//!
//! Turns a fixed weekly class timetable and a set of subject priorities into
//! the week's free time, a concrete study-block allocation, and a display
//! grid. Every operation is a pure function of its inputs; nothing is cached
//! or shared between calls.
//!
//! ## Architecture
//!
//! - **Timeline**: `HH:MM` conversion, free-interval derivation inside a daily
//!   window, and subject priority labels behind a classifier trait
//! - **Schedule**: days of the week, class sessions, timetable ingestion
//! - **Scheduler**: greedy priority-first weekly study allocation
//! - **Grid**: fixed-resolution weekly grid with row spans and conflicts
//! - **Storage**: TOML configuration and JSON input files
//!
//! ## Key Components
//!
//! - [`FreeIntervalDeriver`]: free time between classes
//! - [`WeeklyAllocator`]: study blocks from priorities and free time
//! - [`GridBuilder`]: rows × days display structure
//! - [`PriorityClassifier`]: pluggable subject labelling
//! - [`Config`]: application configuration management

pub mod error;
pub mod grid;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use error::{ConfigError, CoreError, ScheduleError, TimeParseError};
pub use grid::{ConflictReason, Grid, GridBuilder, GridCell, GridItem, PlacementConflict};
pub use schedule::{ClassSession, DayOfWeek, IngestReport, RawSession, SkippedSession, Timetable};
pub use scheduler::{
    DayPlan, DurationTable, PlanSummary, SchedulerConfig, StudyBlock, StudyKind, WeeklyAllocator,
    WeeklyPlan,
};
pub use storage::Config;
pub use timeline::{
    format_time, parse_time, DayWindow, FreeInterval, FreeIntervalDeriver, ManualOverride,
    PriorityClassifier, PriorityLabel, SubjectPriority, SubjectProfile, TimeOfDay,
    WeightRuleClassifier,
};
