use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreError;
use crate::storage::{KeyValueStore, POMODORO_SESSIONS_KEY};

/// Days of history kept behind the current date.
pub const RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySession {
    pub date: NaiveDate,
    pub completed_pomodoros: u32,
    pub total_focus_minutes: u64,
}

/// Per-day completed focus sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHistory {
    days: Vec<DaySession>,
}

impl SessionHistory {
    /// Read the stored history. A corrupt entry reads as empty.
    ///
    /// # Errors
    /// Returns an error only if the store itself fails.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, CoreError> {
        let Some(raw) = store.get(POMODORO_SESSIONS_KEY)? else {
            return Ok(Self::default());
        };
        match serde_json::from_str(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                warn!(error = %e, "discarding unreadable pomodoro history");
                Ok(Self::default())
            }
        }
    }

    /// # Errors
    /// Returns an error if serialization or the store fails.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), CoreError> {
        let json = serde_json::to_string(self)?;
        store.set(POMODORO_SESSIONS_KEY, &json)?;
        Ok(())
    }

    pub fn days(&self) -> &[DaySession] {
        &self.days
    }

    pub fn completed_on(&self, date: NaiveDate) -> u32 {
        self.days
            .iter()
            .find(|d| d.date == date)
            .map_or(0, |d| d.completed_pomodoros)
    }

    /// Upsert the entry for `date` and drop entries past retention.
    pub fn record(&mut self, date: NaiveDate, completed: u32, focus_minutes: u64) {
        let entry = DaySession {
            date,
            completed_pomodoros: completed,
            total_focus_minutes: focus_minutes,
        };
        match self.days.iter_mut().find(|d| d.date == date) {
            Some(existing) => *existing = entry,
            None => self.days.push(entry),
        }
        let cutoff = date - Duration::days(RETENTION_DAYS);
        self.days.retain(|d| d.date >= cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn record_upserts_by_date() {
        let mut history = SessionHistory::default();
        history.record(day(1), 1, 25);
        history.record(day(1), 2, 50);
        assert_eq!(history.days().len(), 1);
        assert_eq!(history.completed_on(day(1)), 2);
        assert_eq!(history.completed_on(day(2)), 0);
    }

    #[test]
    fn old_entries_are_pruned() {
        let mut history = SessionHistory::default();
        history.record(day(1), 3, 75);
        history.record(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(), 1, 25);
        assert_eq!(history.days().len(), 1);
    }

    #[test]
    fn store_roundtrip_and_corruption() {
        let store = MemoryStore::new();
        let mut history = SessionHistory::default();
        history.record(day(3), 4, 100);
        history.save(&store).unwrap();
        assert_eq!(SessionHistory::load(&store).unwrap(), history);

        store.set(POMODORO_SESSIONS_KEY, "not json").unwrap();
        assert_eq!(SessionHistory::load(&store).unwrap(), SessionHistory::default());
    }
}
