use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::AlertKind;
use crate::pomodoro::{PomodoroPhase, PomodoroState};
use crate::schedule::ResolvedState;
use crate::sound::SoundProfile;

/// Every observable state change produces an Event.
/// The UI renders from these; the CLI prints them as JSON lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Resolved block id changed between two ticks.
    BlockTransition {
        from_block: Option<String>,
        to_block: Option<String>,
        local_time: NaiveDateTime,
        at: DateTime<Utc>,
    },
    AlertRaised {
        kind: AlertKind,
        block_id: String,
        message: String,
        /// Whether an alarm loop actually started.
        sound_started: bool,
        at: DateTime<Utc>,
    },
    AlertDismissed {
        at: DateTime<Utc>,
    },
    SoundProfileChanged {
        profile: SoundProfile,
        at: DateTime<Utc>,
    },
    PomodoroStarted {
        phase: PomodoroPhase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    PomodoroPaused {
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    PomodoroResumed {
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    PomodoroStopped {
        at: DateTime<Utc>,
    },
    PomodoroSkipped {
        phase: PomodoroPhase,
        at: DateTime<Utc>,
    },
    PomodoroPhaseCompleted {
        finished: PomodoroPhase,
        next: PomodoroPhase,
        completed_today: u32,
        at: DateTime<Utc>,
    },
    BlockSnapshot {
        #[serde(flatten)]
        state: ResolvedState,
        at: DateTime<Utc>,
    },
    PomodoroSnapshot {
        #[serde(flatten)]
        state: PomodoroState,
        at: DateTime<Utc>,
    },
}
