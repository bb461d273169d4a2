//! Block transition detection.
//!
//! Remembers the block id resolved on the previous tick and reports a
//! transition exactly when it changes. The first resolution after startup
//! only seeds the memory, so opening the app mid-block never reports
//! "block started".

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schedule::{resolve_active_block, TimeBlock};

/// The resolved block id changed between two ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Block active on the previous tick (`None` for unscheduled time).
    pub from: Option<TimeBlock>,
    /// Block active now (`None` for unscheduled time).
    pub to: Option<TimeBlock>,
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
enum Memory {
    #[default]
    Unseeded,
    /// Gap resolutions are remembered too, so starting up in unscheduled
    /// time and then entering a block reports that entry. Seeding waits for
    /// the first resolution, not the first block.
    Seen(Option<TimeBlock>),
}

#[derive(Debug, Clone, Default)]
pub struct TransitionDetector {
    last: Memory,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id resolved on the most recent tick.
    pub fn last_block_id(&self) -> Option<&str> {
        match &self.last {
            Memory::Seen(Some(block)) => Some(block.id.as_str()),
            _ => None,
        }
    }

    /// Block resolved on the most recent tick.
    pub fn last_block(&self) -> Option<&TimeBlock> {
        match &self.last {
            Memory::Seen(block) => block.as_ref(),
            Memory::Unseeded => None,
        }
    }

    /// Resolve `at` against `schedule` and report a change of block id.
    pub fn tick(&mut self, schedule: &[TimeBlock], at: NaiveDateTime) -> Option<Transition> {
        let resolved = resolve_active_block(schedule, at).cloned();
        self.observe(resolved, at)
    }

    /// Feed an already-resolved block.
    pub fn observe(&mut self, resolved: Option<TimeBlock>, at: NaiveDateTime) -> Option<Transition> {
        let previous = match std::mem::take(&mut self.last) {
            Memory::Unseeded => {
                debug!(block = ?resolved.as_ref().map(|b| &b.id), "seeded transition detector");
                self.last = Memory::Seen(resolved);
                return None;
            }
            Memory::Seen(previous) => previous,
        };

        let changed = previous.as_ref().map(|b| &b.id) != resolved.as_ref().map(|b| &b.id);
        self.last = Memory::Seen(resolved.clone());
        if !changed {
            return None;
        }

        debug!(
            from = ?previous.as_ref().map(|b| &b.id),
            to = ?resolved.as_ref().map(|b| &b.id),
            "block transition"
        );
        Some(Transition {
            from: previous,
            to: resolved,
            at,
        })
    }

    /// Forget everything; the next tick seeds again.
    pub fn reset(&mut self) {
        self.last = Memory::Unseeded;
    }
}
