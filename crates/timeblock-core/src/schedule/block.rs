use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

use crate::error::ValidationError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A local wall-clock time with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn minutes_of_day(self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// 12-hour display, e.g. `9:00 AM`, `12:05 AM`, `1:30 PM`.
    pub fn to_12h(self) -> String {
        let period = if self.hour >= 12 { "PM" } else { "AM" };
        let display_hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{display_hour}:{:02} {period}", self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Minutes since local midnight for an instant.
pub fn minute_of_day(at: NaiveDateTime) -> u32 {
    at.hour() * 60 + at.minute()
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(s: &str) -> Result<chrono::NaiveTime, ValidationError> {
    chrono::NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| chrono::NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ValidationError::InvalidClockTime(s.to_string()))
}

/// A named, typed interval of the day.
///
/// A block whose end clock-time precedes its start clock-time is
/// overnight: it ends on the day after it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: String,
    pub name: String,
    pub start_hour: u32,
    pub start_minute: u32,
    pub end_hour: u32,
    pub end_minute: u32,
    /// Open category tag ("sleep", "break", or anything custom).
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    /// Categories the UI forbids interacting with while this block is active.
    #[serde(default)]
    pub locked_categories: Vec<String>,
}

impl TimeBlock {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: ClockTime,
        end: ClockTime,
        block_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_hour: start.hour,
            start_minute: start.minute,
            end_hour: end.hour,
            end_minute: end.minute,
            block_type: block_type.into(),
            tasks: Vec::new(),
            locked_categories: Vec::new(),
        }
    }

    pub fn with_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks = tasks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locked<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locked_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn start(&self) -> ClockTime {
        ClockTime::new(self.start_hour, self.start_minute)
    }

    pub fn end(&self) -> ClockTime {
        ClockTime::new(self.end_hour, self.end_minute)
    }

    pub fn is_overnight(&self) -> bool {
        self.end().minutes_of_day() < self.start().minutes_of_day()
    }

    pub fn is_sleep(&self) -> bool {
        self.block_type.eq_ignore_ascii_case("sleep")
    }

    /// Whether the block's `[start, end)` interval covers `minute`,
    /// wrapping past midnight for overnight blocks.
    pub fn contains_minute(&self, minute: u32) -> bool {
        let start = self.start().minutes_of_day();
        let end = self.end().minutes_of_day();
        if self.is_overnight() {
            minute >= start || minute < end
        } else {
            start <= minute && minute < end
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        let start = self.start().minutes_of_day();
        let end = self.end().minutes_of_day();
        if self.is_overnight() {
            end + MINUTES_PER_DAY - start
        } else {
            end - start
        }
    }

    /// Calendar date on which the occurrence covering `at` started.
    ///
    /// Only the post-midnight part of an overnight block belongs to the
    /// previous day.
    pub fn occurrence_date(&self, at: NaiveDateTime) -> NaiveDate {
        let date = at.date();
        if self.is_overnight() && minute_of_day(at) < self.end().minutes_of_day() {
            date - Duration::days(1)
        } else {
            date
        }
    }

    /// Start date of the occurrence that ends exactly at `at`.
    pub fn occurrence_date_ending_at(&self, at: NaiveDateTime) -> NaiveDate {
        if self.is_overnight() {
            at.date() - Duration::days(1)
        } else {
            at.date()
        }
    }
}

/// Ordered sequence of blocks forming one daily cycle.
///
/// Order is the cycle order used for next-block lookup; it is kept exactly
/// as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    blocks: Vec<TimeBlock>,
}

impl Schedule {
    pub fn new(blocks: Vec<TimeBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    pub fn get(&self, id: &str) -> Option<&TimeBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

impl Deref for Schedule {
    type Target = [TimeBlock];

    fn deref(&self) -> &Self::Target {
        &self.blocks
    }
}

impl From<Vec<TimeBlock>> for Schedule {
    fn from(blocks: Vec<TimeBlock>) -> Self {
        Self::new(blocks)
    }
}

/// True iff a block is active and it locks `category`.
pub fn is_block_locked(current: Option<&TimeBlock>, category: &str) -> bool {
    current.is_some_and(|b| b.locked_categories.iter().any(|c| c == category))
}
