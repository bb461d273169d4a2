use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::TimeBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Start,
    End,
}

/// What the alert surface shows. Hidden until a trigger fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    pub is_visible: bool,
    pub kind: Option<AlertKind>,
    pub block: Option<TimeBlock>,
    pub next_block: Option<TimeBlock>,
    pub message: String,
}

/// One concrete entry into, or exit from, a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OccurrenceKey {
    pub block_id: String,
    /// Calendar date on which the occurrence started.
    pub date: NaiveDate,
    pub kind: AlertKind,
}

impl OccurrenceKey {
    pub fn new(block_id: impl Into<String>, date: NaiveDate, kind: AlertKind) -> Self {
        Self {
            block_id: block_id.into(),
            date,
            kind,
        }
    }
}

/// Everything the alert controller remembers between ticks.
#[derive(Debug, Clone, Default)]
pub struct AlertControllerState {
    pub alert: AlertState,
    fired: HashSet<OccurrenceKey>,
}

impl AlertControllerState {
    /// Record `key`. Returns false if it had already fired.
    pub fn mark_fired(&mut self, key: OccurrenceKey) -> bool {
        self.fired.insert(key)
    }

    pub fn has_fired(&self, key: &OccurrenceKey) -> bool {
        self.fired.contains(key)
    }

    /// Forget occurrences that started before `cutoff`.
    pub fn prune_before(&mut self, cutoff: NaiveDate) {
        self.fired.retain(|k| k.date >= cutoff);
    }

    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }
}
