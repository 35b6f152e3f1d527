//! Minute-of-day arithmetic and `HH:MM` conversion.
//!
//! Every time value in the crate goes through [`TimeOfDay`], which can only be
//! built from a validated minute count or a successfully parsed string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ScheduleError, TimeParseError};

/// Minutes in one day; `TimeOfDay` values are strictly below this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day as minutes since midnight, in `[0, 1440)`.
///
/// Serializes as a zero-padded `"HH:MM"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from minutes since midnight. `None` when `minutes >= 1440`.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes as u16))
    }

    /// Build from an hour and minute pair.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Parse a strict 24-hour `HH:MM` string.
    ///
    /// Both components must be exactly two ASCII digits, so `"9:5"` and
    /// `"09:5"` are rejected rather than guessed at.
    ///
    /// # Errors
    /// Returns a [`TimeParseError`] describing the first problem found.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| TimeParseError::MissingColon(s.to_string()))?;

        for part in [h, m] {
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimeParseError::NonNumeric(s.to_string()));
            }
            if part.len() != 2 {
                return Err(TimeParseError::BadWidth(s.to_string()));
            }
        }

        // Two ASCII digits always fit in u32.
        let hour: u32 = h.parse().map_err(|_| TimeParseError::NonNumeric(s.to_string()))?;
        let minute: u32 = m.parse().map_err(|_| TimeParseError::NonNumeric(s.to_string()))?;

        if hour > 23 {
            return Err(TimeParseError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange(minute));
        }

        Ok(Self((hour * 60 + minute) as u16))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Add minutes, returning `None` if the result would pass midnight.
    pub fn add_minutes(self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.minutes().checked_add(minutes)?)
    }

    /// Minutes from `self` until `later`, saturating at zero.
    pub fn minutes_until(self, later: TimeOfDay) -> u32 {
        later.minutes().saturating_sub(self.minutes())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Parse an `HH:MM` string into a [`TimeOfDay`].
pub fn parse_time(s: &str) -> Result<TimeOfDay, TimeParseError> {
    TimeOfDay::parse(s)
}

/// Format a [`TimeOfDay`] as zero-padded `HH:MM`.
pub fn format_time(t: TimeOfDay) -> String {
    t.to_string()
}

/// Convert a minute count to fractional hours.
pub fn minutes_to_hours(minutes: u32) -> f64 {
    f64::from(minutes) / 60.0
}

/// The bounding daily window `[start, end)` in which free time is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl DayWindow {
    /// Create a window.
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidWindow`] unless `start < end`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, ScheduleError> {
        if start >= end {
            return Err(ScheduleError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ScheduleError> {
        Self::new(TimeOfDay::parse(start)?, TimeOfDay::parse(end)?)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }

    /// True when `[start, end)` intersects the window.
    pub fn overlaps(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        end > self.start && start < self.end
    }
}

impl Default for DayWindow {
    /// 09:00 - 21:00
    fn default() -> Self {
        Self {
            start: TimeOfDay(9 * 60),
            end: TimeOfDay(21 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_times() {
        assert_eq!(parse_time("00:00").unwrap().minutes(), 0);
        assert_eq!(parse_time("09:05").unwrap().minutes(), 545);
        assert_eq!(parse_time("23:59").unwrap().minutes(), 1439);
    }

    #[test]
    fn rejects_unpadded_times() {
        assert_eq!(
            parse_time("9:5"),
            Err(TimeParseError::BadWidth("9:5".to_string()))
        );
        assert!(parse_time("9:05").is_err());
        assert!(parse_time("09:5").is_err());
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(
            parse_time("0900"),
            Err(TimeParseError::MissingColon("0900".to_string()))
        );
        assert!(matches!(parse_time("ab:cd"), Err(TimeParseError::NonNumeric(_))));
        assert!(matches!(parse_time("09:00:00"), Err(TimeParseError::NonNumeric(_))));
        assert!(matches!(parse_time(" 9:00"), Err(TimeParseError::NonNumeric(_))));
        assert_eq!(parse_time("24:00"), Err(TimeParseError::HourOutOfRange(24)));
        assert_eq!(parse_time("12:60"), Err(TimeParseError::MinuteOutOfRange(60)));
        assert!(parse_time("").is_err());
    }

    #[test]
    fn format_round_trips_every_minute() {
        for m in 0..MINUTES_PER_DAY {
            let t = TimeOfDay::from_minutes(m).unwrap();
            assert_eq!(parse_time(&format_time(t)), Ok(t));
        }
    }

    #[test]
    fn from_minutes_bounds() {
        assert!(TimeOfDay::from_minutes(1439).is_some());
        assert!(TimeOfDay::from_minutes(1440).is_none());
        assert!(TimeOfDay::from_hm(23, 60).is_none());
        assert_eq!(TimeOfDay::from_hm(23, 30).unwrap().add_minutes(30), None);
    }

    #[test]
    fn serializes_as_string() {
        let t = TimeOfDay::from_hm(7, 30).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"07:30\"");
        let back: TimeOfDay = serde_json::from_str("\"07:30\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TimeOfDay>("\"7:30\"").is_err());
    }

    #[test]
    fn window_validation() {
        assert!(DayWindow::parse("21:00", "09:00").is_err());
        assert!(DayWindow::parse("09:00", "09:00").is_err());
        let w = DayWindow::default();
        assert_eq!(w.duration_minutes(), 12 * 60);
        assert_eq!(w.start.to_string(), "09:00");
    }
}
