mod engine;
mod history;

pub use engine::{PomodoroDurations, PomodoroEngine, PomodoroPhase, PomodoroState};
pub use history::{DaySession, SessionHistory, RETENTION_DAYS};
