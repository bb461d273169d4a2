//! Pure block resolution over a schedule and a wall-clock instant.
//!
//! Resolution is minute-granular. The countdown inside a block is
//! second-granular and reaches `00:00` exactly at the top of the block's
//! end minute.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::block::{minute_of_day, TimeBlock, MINUTES_PER_DAY};

/// Time left in the active block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub total_seconds: u64,
}

impl RemainingTime {
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
        total_seconds: 0,
    };

    /// Decompose a second count, clamping negatives to zero.
    pub fn from_total_seconds(total: i64) -> Self {
        let total = total.max(0) as u64;
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
            total_seconds: total,
        }
    }

    pub fn urgency(&self) -> CountdownUrgency {
        CountdownUrgency::from_seconds(self.total_seconds)
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        } else {
            write!(f, "{:02}:{:02}", self.minutes, self.seconds)
        }
    }
}

/// Display tier of the block countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownUrgency {
    Active,
    /// Last five minutes.
    Warning,
    /// Last minute.
    Urgent,
}

impl CountdownUrgency {
    pub fn from_seconds(total_seconds: u64) -> Self {
        if total_seconds <= 60 {
            CountdownUrgency::Urgent
        } else if total_seconds <= 300 {
            CountdownUrgency::Warning
        } else {
            CountdownUrgency::Active
        }
    }
}

/// Everything derivable from a schedule at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedState {
    pub current_block: Option<TimeBlock>,
    pub next_block: Option<TimeBlock>,
    pub remaining: RemainingTime,
}

/// First block whose interval covers `at`, or `None` in unscheduled time.
///
/// Blocks are assumed non-overlapping; with overlaps, list order wins.
pub fn resolve_active_block(schedule: &[TimeBlock], at: NaiveDateTime) -> Option<&TimeBlock> {
    let minute = minute_of_day(at);
    schedule.iter().find(|b| b.contains_minute(minute))
}

/// Circular successor of `current` in schedule order.
///
/// With no current block, or one no longer in the schedule, this is the
/// first block.
pub fn resolve_next_block<'a>(
    schedule: &'a [TimeBlock],
    current: Option<&TimeBlock>,
) -> Option<&'a TimeBlock> {
    let Some(current) = current else {
        return schedule.first();
    };
    match schedule.iter().position(|b| b.id == current.id) {
        Some(index) => schedule.get((index + 1) % schedule.len()),
        None => schedule.first(),
    }
}

/// Time from `at` until `block` ends, never negative.
pub fn remaining_time(block: &TimeBlock, at: NaiveDateTime) -> RemainingTime {
    let current_minutes = i64::from(minute_of_day(at));
    let start = i64::from(block.start().minutes_of_day());
    let mut end = i64::from(block.end().minutes_of_day());
    if block.is_overnight() && current_minutes >= start {
        end += i64::from(MINUTES_PER_DAY);
    }

    // Count whole minutes left before the current one, then the seconds
    // left in the current minute (60 - s lands on 1, never 0).
    let remaining_minutes = end - current_minutes - 1;
    let remaining_seconds = 60 - i64::from(at.second());
    RemainingTime::from_total_seconds(remaining_minutes * 60 + remaining_seconds)
}

/// Resolve current block, circular next block and countdown in one pass.
pub fn resolve(schedule: &[TimeBlock], at: NaiveDateTime) -> ResolvedState {
    let current = resolve_active_block(schedule, at);
    let next = resolve_next_block(schedule, current);
    let remaining = current
        .map(|b| remaining_time(b, at))
        .unwrap_or(RemainingTime::ZERO);
    ResolvedState {
        current_block: current.cloned(),
        next_block: next.cloned(),
        remaining,
    }
}
