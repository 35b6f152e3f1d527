//! Weekly display grid.
//!
//! Discretizes the daily window into fixed-width rows (30 minutes by default)
//! with one column per day. Each class or study block occupies the row where
//! it starts and covers the rows below it that its duration reaches. Items
//! that collide with an already placed item are dropped and reported.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::schedule::{ClassSession, DayOfWeek, Timetable};
use crate::scheduler::{StudyBlock, StudyKind, WeeklyPlan};
use crate::timeline::{DayWindow, TimeOfDay};

/// Default row height in minutes.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// Default class colors, assigned to subjects in alphabetical order.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#f8b4b4", "#fcd9a8", "#fdf3a7", "#c6f0c2", "#b5e3f5", "#c7cdfa", "#e3c4f7", "#f5c2de",
];

/// Something that can sit in the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GridItem {
    Class(ClassSession),
    Study(StudyBlock),
}

impl GridItem {
    pub fn day(&self) -> DayOfWeek {
        match self {
            Self::Class(c) => c.day,
            Self::Study(s) => s.day,
        }
    }

    pub fn start(&self) -> TimeOfDay {
        match self {
            Self::Class(c) => c.start,
            Self::Study(s) => s.start,
        }
    }

    pub fn end(&self) -> TimeOfDay {
        match self {
            Self::Class(c) => c.end,
            Self::Study(s) => s.end,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            Self::Class(c) => &c.subject,
            Self::Study(s) => &s.subject,
        }
    }
}

/// One `(row, day)` position of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cell", rename_all = "lowercase")]
pub enum GridCell {
    Empty,
    /// Part of an item that starts in a row above
    Covered,
    Occupied {
        item: GridItem,
        row_span: usize,
        /// `None` renders transparent
        color: Option<String>,
    },
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Why an item was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConflictReason {
    /// A row it needs is already taken
    Overlap,
    /// It does not intersect the grid's window
    OutsideWindow,
}

/// An item the builder had to drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementConflict {
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub subject: String,
    pub reason: ConflictReason,
}

/// The populated weekly grid.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    pub slot_minutes: u32,
    /// Start time of each row
    pub rows: Vec<TimeOfDay>,
    /// `cells[row][day.index()]`
    pub cells: Vec<Vec<GridCell>>,
    /// Class subject -> color
    pub colors: BTreeMap<String, String>,
    pub conflicts: Vec<PlacementConflict>,
}

impl Grid {
    /// Get the cell at a row and day.
    pub fn cell(&self, row: usize, day: DayOfWeek) -> Option<&GridCell> {
        self.cells.get(row)?.get(day.index())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The time range an occupied cell represents: its row start plus
    /// `row_span` rows. `None` for empty or covered cells.
    pub fn occupied_range(&self, row: usize, day: DayOfWeek) -> Option<(TimeOfDay, TimeOfDay)> {
        match self.cell(row, day)? {
            GridCell::Occupied { row_span, .. } => {
                let start = *self.rows.get(row)?;
                let end = start.add_minutes(*row_span as u32 * self.slot_minutes)?;
                Some((start, end))
            }
            _ => None,
        }
    }

    /// Every placed item with its row, day and span.
    pub fn placed(&self) -> impl Iterator<Item = (usize, DayOfWeek, &GridItem, usize)> {
        self.cells.iter().enumerate().flat_map(|(row, columns)| {
            columns
                .iter()
                .zip(DayOfWeek::ALL)
                .filter_map(move |(cell, day)| match cell {
                    GridCell::Occupied { item, row_span, .. } => Some((row, day, item, *row_span)),
                    _ => None,
                })
        })
    }

    /// Render the grid as fixed-width text, one line per row.
    pub fn render_ascii(&self, column_width: usize) -> String {
        let width = column_width.max(4);
        let mut output = String::new();

        output.push_str("      ");
        for day in DayOfWeek::ALL {
            output.push_str(&format!("| {:<w$}", &day.as_str()[..3], w = width - 1));
        }
        output.push('\n');
        output.push_str(&"-".repeat(6 + 7 * (width + 1)));
        output.push('\n');

        for (row, start) in self.rows.iter().enumerate() {
            output.push_str(&format!("{start} "));
            for day in DayOfWeek::ALL {
                let text = match self.cell(row, day) {
                    Some(GridCell::Occupied { item, .. }) => {
                        let marker = match item {
                            GridItem::Class(_) => "",
                            GridItem::Study(s) if s.kind == StudyKind::Review => "R:",
                            GridItem::Study(_) => "P:",
                        };
                        let label = format!("{marker}{}", item.subject());
                        label.chars().take(width - 1).collect::<String>()
                    }
                    Some(GridCell::Covered) => "  .".to_string(),
                    _ => String::new(),
                };
                output.push_str(&format!("| {:<w$}", text, w = width - 1));
            }
            output.push('\n');
        }

        if !self.conflicts.is_empty() {
            output.push_str(&format!("\n{} item(s) not placed:\n", self.conflicts.len()));
            for c in &self.conflicts {
                output.push_str(&format!(
                    "  {} {}-{} {} ({:?})\n",
                    c.day, c.start, c.end, c.subject, c.reason
                ));
            }
        }

        output
    }
}

/// Builds a [`Grid`] from classes and study blocks.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    window: DayWindow,
    slot_minutes: u32,
    palette: Vec<String>,
}

impl GridBuilder {
    /// Create a builder with 30-minute rows and the default palette.
    pub fn new(window: DayWindow) -> Self {
        Self {
            window,
            slot_minutes: DEFAULT_SLOT_MINUTES,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Set the row height (at least one minute).
    pub fn with_slot_minutes(mut self, minutes: u32) -> Self {
        self.slot_minutes = minutes.max(1);
        self
    }

    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        self.palette = palette;
        self
    }

    /// Row start times covering the window.
    pub fn rows(&self) -> Vec<TimeOfDay> {
        let count = self.window.duration_minutes() / self.slot_minutes;
        (0..count)
            .filter_map(|i| self.window.start.add_minutes(i * self.slot_minutes))
            .collect()
    }

    /// Place classes, then study blocks, each in day and start order.
    pub fn build(&self, classes: &[ClassSession], blocks: &[StudyBlock]) -> Grid {
        let rows = self.rows();
        let mut grid = Grid {
            slot_minutes: self.slot_minutes,
            cells: vec![vec![GridCell::Empty; DayOfWeek::ALL.len()]; rows.len()],
            rows,
            colors: self.assign_colors(classes),
            conflicts: Vec::new(),
        };

        let mut classes: Vec<&ClassSession> = classes.iter().collect();
        classes.sort_by_key(|c| (c.day, c.start));
        let mut blocks: Vec<&StudyBlock> = blocks.iter().collect();
        blocks.sort_by_key(|b| (b.day, b.start));

        let items = classes
            .into_iter()
            .map(|c| GridItem::Class(c.clone()))
            .chain(blocks.into_iter().map(|b| GridItem::Study(b.clone())));

        for item in items {
            self.place(&mut grid, item);
        }

        grid
    }

    /// Grid for a timetable and the plan allocated against it.
    pub fn build_plan(&self, timetable: &Timetable, plan: &WeeklyPlan) -> Grid {
        let blocks: Vec<StudyBlock> = plan.blocks().cloned().collect();
        self.build(timetable.sessions(), &blocks)
    }

    fn assign_colors(&self, classes: &[ClassSession]) -> BTreeMap<String, String> {
        if self.palette.is_empty() {
            return BTreeMap::new();
        }
        let subjects: BTreeSet<&str> = classes.iter().map(|c| c.subject.as_str()).collect();
        subjects
            .into_iter()
            .enumerate()
            .map(|(i, subject)| {
                (
                    subject.to_string(),
                    self.palette[i % self.palette.len()].clone(),
                )
            })
            .collect()
    }

    fn place(&self, grid: &mut Grid, item: GridItem) {
        let slot = self.slot_minutes;
        let first = self.window.start.minutes();
        let last = first + grid.rows.len() as u32 * slot;
        let (start, end) = (item.start().minutes(), item.end().minutes());

        if end <= first || start >= last {
            self.reject(grid, &item, ConflictReason::OutsideWindow);
            return;
        }

        // Unaligned starts snap to the row containing them.
        let row = (start.max(first) - first) / slot;
        let row_start = first + row * slot;
        let span = end.min(last).saturating_sub(row_start).div_ceil(slot).max(1);
        let (row, span) = (row as usize, span as usize);
        let col = item.day().index();

        if (row..row + span).any(|r| !grid.cells[r][col].is_empty()) {
            self.reject(grid, &item, ConflictReason::Overlap);
            return;
        }

        let color = match &item {
            GridItem::Class(c) => grid.colors.get(&c.subject).cloned(),
            GridItem::Study(_) => None,
        };

        for r in row + 1..row + span {
            grid.cells[r][col] = GridCell::Covered;
        }
        grid.cells[row][col] = GridCell::Occupied {
            item,
            row_span: span,
            color,
        };
    }

    fn reject(&self, grid: &mut Grid, item: &GridItem, reason: ConflictReason) {
        tracing::warn!(
            day = %item.day(),
            start = %item.start(),
            end = %item.end(),
            subject = item.subject(),
            ?reason,
            "grid placement conflict, item dropped"
        );
        grid.conflicts.push(PlacementConflict {
            day: item.day(),
            start: item.start(),
            end: item.end(),
            subject: item.subject().to_string(),
            reason,
        });
    }
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new(DayWindow::default())
    }
}
