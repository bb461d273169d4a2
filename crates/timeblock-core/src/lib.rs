//! # Timeblock Core Library
//!
//! Core logic for the Timeblock day planner: which block of the day is
//! active, when block alerts fire, and an independent pomodoro timer. The
//! `timeblock` CLI is a thin shell over this crate.
//!
//! ## Architecture
//!
//! - **Schedule**: pure resolution of the active block, the circular next
//!   block and the remaining time, including one overnight block
//! - **Transitions**: tick-driven detection of block changes
//! - **Alerts**: once-per-occurrence start/end alerts with a looping alarm
//! - **Sound**: fixed tone patterns per profile, scheduled on an audio sink
//! - **Pomodoro**: focus/break countdown with a persisted daily count
//! - **Storage**: SQLite key-value store and TOML configuration
//!
//! Every engine is driven by `tick()` calls from the caller; [`Runtime`]
//! provides the 1 Hz loops.
//!
//! ## Key Components
//!
//! - [`DayTracker`]: resolve, detect and alert for one tick
//! - [`AlertController`]: alert state machine and alarm policy
//! - [`PomodoroEngine`]: pomodoro phase cycle
//! - [`Config`]: application configuration management

pub mod alert;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod pomodoro;
pub mod runtime;
pub mod schedule;
pub mod sound;
pub mod storage;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod tracker;
pub mod transition;

pub use alert::{AlertController, AlertKind, AlertState, AlwaysVisible, Visibility};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, NotifyError, SoundError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{LogNotifier, Notifier, NullNotifier};
pub use pomodoro::{PomodoroDurations, PomodoroEngine, PomodoroPhase, PomodoroState, SessionHistory};
pub use runtime::{Command, Runtime};
pub use schedule::{ResolvedState, Schedule, TimeBlock};
pub use sound::{AudioSink, SoundPlayer, SoundProfile};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use tracker::{DayTracker, TickReport};
pub use transition::{Transition, TransitionDetector};
