//! Pomodoro countdown and phase cycle.
//!
//! The engine counts down one second per `tick()` while running; it has no
//! thread of its own. The caller drives it from a 1 Hz interval.
//!
//! ## Phase Cycle
//!
//! ```text
//! Idle -> Focus -> (Break | LongBreak) -> Idle
//! ```
//!
//! Every completed focus phase bumps the day's count; every Nth one earns a
//! long break. Skipped or stopped phases never count.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::history::SessionHistory;
use crate::events::Event;
use crate::notify::{notify_best_effort, Notifier};
use crate::sound::{completion_chime, SoundPlayer};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroPhase {
    Idle,
    Focus,
    Break,
    LongBreak,
}

/// Phase lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroDurations {
    pub focus_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    pub sessions_before_long_break: u32,
}

impl Default for PomodoroDurations {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            sessions_before_long_break: 4,
        }
    }
}

impl PomodoroDurations {
    /// Countdown length for a phase; idle shows a fresh focus countdown.
    pub fn for_phase(&self, phase: PomodoroPhase) -> u64 {
        match phase {
            PomodoroPhase::Idle | PomodoroPhase::Focus => self.focus_secs,
            PomodoroPhase::Break => self.short_break_secs,
            PomodoroPhase::LongBreak => self.long_break_secs,
        }
    }
}

/// Snapshot for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroState {
    pub phase: PomodoroPhase,
    pub seconds_remaining: u64,
    pub completed_count_today: u32,
    pub is_running: bool,
    /// Elapsed fraction of the current phase, 0.0 when idle.
    pub progress: f64,
    /// `MM:SS`
    pub formatted_time: String,
}

pub struct PomodoroEngine {
    durations: PomodoroDurations,
    phase: PomodoroPhase,
    seconds_remaining: u64,
    running: bool,
    completed_today: u32,
    today: NaiveDate,
    store: Box<dyn KeyValueStore>,
    notifier: Box<dyn Notifier>,
    sound: Option<SoundPlayer>,
}

impl PomodoroEngine {
    /// Create an idle engine, restoring today's completed count from `store`.
    pub fn new(
        durations: PomodoroDurations,
        store: Box<dyn KeyValueStore>,
        notifier: Box<dyn Notifier>,
        today: NaiveDate,
    ) -> Self {
        let completed_today = load_completed(store.as_ref(), today);
        Self {
            durations,
            phase: PomodoroPhase::Idle,
            seconds_remaining: durations.focus_secs,
            running: false,
            completed_today,
            today,
            store,
            notifier,
            sound: None,
        }
    }

    /// Play a short chime whenever a phase completes.
    pub fn with_sound(mut self, player: SoundPlayer) -> Self {
        self.sound = Some(player);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_count_today(&self) -> u32 {
        self.completed_today
    }

    pub fn durations(&self) -> &PomodoroDurations {
        &self.durations
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.phase == PomodoroPhase::Idle {
            return 0.0;
        }
        let total = self.durations.for_phase(self.phase);
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.seconds_remaining);
        elapsed as f64 / total as f64
    }

    pub fn formatted_time(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.seconds_remaining / 60,
            self.seconds_remaining % 60
        )
    }

    pub fn state(&self) -> PomodoroState {
        PomodoroState {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            completed_count_today: self.completed_today,
            is_running: self.running,
            progress: self.progress(),
            formatted_time: self.formatted_time(),
        }
    }

    pub fn snapshot(&self) -> Event {
        Event::PomodoroSnapshot {
            state: self.state(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_focus(&mut self) -> Option<Event> {
        self.enter(PomodoroPhase::Focus)
    }

    pub fn start_break(&mut self, is_long: bool) -> Option<Event> {
        self.enter(if is_long {
            PomodoroPhase::LongBreak
        } else {
            PomodoroPhase::Break
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::PomodoroPaused {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.running || self.phase == PomodoroPhase::Idle {
            return None;
        }
        self.running = true;
        Some(Event::PomodoroResumed {
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Force idle without touching today's count.
    pub fn stop(&mut self) -> Option<Event> {
        self.reset_to_idle();
        Some(Event::PomodoroStopped { at: Utc::now() })
    }

    /// Abandon the current phase; a skipped focus phase is never counted.
    pub fn skip(&mut self) -> Option<Event> {
        let phase = self.phase;
        self.reset_to_idle();
        Some(Event::PomodoroSkipped {
            phase,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::PomodoroPhaseCompleted)` when a phase finishes.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Event> {
        self.roll_over(now.date());
        if !self.running {
            return None;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return None;
        }
        Some(self.complete_phase())
    }

    /// Stop everything; used on teardown.
    pub fn shutdown(&mut self) {
        self.running = false;
        if let Some(player) = self.sound.as_mut() {
            player.stop();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, phase: PomodoroPhase) -> Option<Event> {
        self.phase = phase;
        self.seconds_remaining = self.durations.for_phase(phase);
        self.running = true;
        info!(?phase, secs = self.seconds_remaining, "pomodoro phase started");
        Some(Event::PomodoroStarted {
            phase,
            duration_secs: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    fn reset_to_idle(&mut self) {
        self.phase = PomodoroPhase::Idle;
        self.seconds_remaining = self.durations.focus_secs;
        self.running = false;
    }

    fn complete_phase(&mut self) -> Event {
        let finished = self.phase;
        if let Some(player) = self.sound.as_mut() {
            player.play_once(&completion_chime(), true);
        }

        match finished {
            PomodoroPhase::Focus => {
                self.completed_today += 1;
                self.persist_completed();

                let every = self.durations.sessions_before_long_break.max(1);
                let long = self.completed_today % every == 0;
                self.phase = if long {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::Break
                };
                self.seconds_remaining = self.durations.for_phase(self.phase);
                let body = format!("Take a {}-minute break.", self.seconds_remaining / 60);
                let body = if long { format!("Great work! {body}") } else { body };
                notify_best_effort(self.notifier.as_ref(), "Pomodoro Complete!", &body);
            }
            PomodoroPhase::Break | PomodoroPhase::LongBreak | PomodoroPhase::Idle => {
                self.reset_to_idle();
                notify_best_effort(
                    self.notifier.as_ref(),
                    "Break Over",
                    "Ready for another focus session?",
                );
            }
        }

        info!(
            ?finished,
            next = ?self.phase,
            completed_today = self.completed_today,
            "pomodoro phase completed"
        );
        Event::PomodoroPhaseCompleted {
            finished,
            next: self.phase,
            completed_today: self.completed_today,
            at: Utc::now(),
        }
    }

    fn roll_over(&mut self, date: NaiveDate) {
        if date == self.today {
            return;
        }
        self.today = date;
        self.completed_today = load_completed(self.store.as_ref(), date);
        info!(%date, completed = self.completed_today, "pomodoro day rolled over");
    }

    fn persist_completed(&self) {
        let result = SessionHistory::load(self.store.as_ref()).and_then(|mut history| {
            let focus_minutes = u64::from(self.completed_today) * (self.durations.focus_secs / 60);
            history.record(self.today, self.completed_today, focus_minutes);
            history.save(self.store.as_ref())
        });
        if let Err(e) = result {
            warn!(error = %e, "failed to persist pomodoro count");
        }
    }
}

fn load_completed(store: &dyn KeyValueStore, date: NaiveDate) -> u32 {
    match SessionHistory::load(store) {
        Ok(history) => history.completed_on(date),
        Err(e) => {
            warn!(error = %e, "pomodoro history unavailable");
            0
        }
    }
}

impl std::fmt::Debug for PomodoroEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PomodoroEngine")
            .field("phase", &self.phase)
            .field("seconds_remaining", &self.seconds_remaining)
            .field("running", &self.running)
            .field("completed_today", &self.completed_today)
            .field("today", &self.today)
            .finish()
    }
}
