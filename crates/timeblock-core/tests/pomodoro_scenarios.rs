//! Pomodoro cycles against a real SQLite store.

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use timeblock_core::notify::NullNotifier;
use timeblock_core::pomodoro::{PomodoroDurations, PomodoroEngine, PomodoroPhase, SessionHistory};
use timeblock_core::storage::Database;
use timeblock_core::Event;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn noon() -> NaiveDateTime {
    today().and_hms_opt(12, 0, 0).unwrap()
}

fn durations() -> PomodoroDurations {
    PomodoroDurations {
        focus_secs: 5,
        short_break_secs: 2,
        long_break_secs: 3,
        sessions_before_long_break: 4,
    }
}

fn engine_at(dir: &TempDir) -> PomodoroEngine {
    let db = Database::open_at(&dir.path().join("timeblock.db")).unwrap();
    PomodoroEngine::new(durations(), Box::new(db), Box::new(NullNotifier), today())
}

/// Run one focus phase to completion and return the phase it moved to.
fn complete_focus(engine: &mut PomodoroEngine) -> PomodoroPhase {
    engine.start_focus();
    loop {
        if let Some(Event::PomodoroPhaseCompleted { next, .. }) = engine.tick(noon()) {
            return next;
        }
    }
}

#[test]
fn fifth_session_after_long_break_is_short() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_at(&dir);

    let phases: Vec<PomodoroPhase> = (0..5).map(|_| complete_focus(&mut engine)).collect();
    assert_eq!(
        phases,
        vec![
            PomodoroPhase::Break,
            PomodoroPhase::Break,
            PomodoroPhase::Break,
            PomodoroPhase::LongBreak,
            PomodoroPhase::Break,
        ]
    );
    assert_eq!(engine.completed_count_today(), 5);
}

#[test]
fn count_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_at(&dir);
        for _ in 0..4 {
            complete_focus(&mut engine);
        }
        assert_eq!(engine.completed_count_today(), 4);
    }

    let mut engine = engine_at(&dir);
    assert_eq!(engine.completed_count_today(), 4);
    assert_eq!(complete_focus(&mut engine), PomodoroPhase::Break);
    assert_eq!(engine.completed_count_today(), 5);

    let db = Database::open_at(&dir.path().join("timeblock.db")).unwrap();
    let history = SessionHistory::load(&db).unwrap();
    assert_eq!(history.completed_on(today()), 5);
}

#[test]
fn full_cycle_returns_to_idle() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_at(&dir);
    assert_eq!(complete_focus(&mut engine), PomodoroPhase::Break);

    let mut completed = None;
    for _ in 0..2 {
        if let Some(event) = engine.tick(noon()) {
            completed = Some(event);
        }
    }
    assert!(matches!(
        completed,
        Some(Event::PomodoroPhaseCompleted {
            finished: PomodoroPhase::Break,
            next: PomodoroPhase::Idle,
            ..
        })
    ));
    assert!(!engine.is_running());
    assert_eq!(engine.seconds_remaining(), 5);
}

#[test]
fn manual_break_does_not_count() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_at(&dir);
    engine.start_break(true);
    assert_eq!(engine.phase(), PomodoroPhase::LongBreak);
    assert_eq!(engine.seconds_remaining(), 3);
    for _ in 0..3 {
        engine.tick(noon());
    }
    assert_eq!(engine.phase(), PomodoroPhase::Idle);
    assert_eq!(engine.completed_count_today(), 0);
}

#[test]
fn stop_keeps_count_and_skip_discards_focus() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_at(&dir);
    complete_focus(&mut engine);
    engine.stop();
    assert_eq!(engine.phase(), PomodoroPhase::Idle);
    assert_eq!(engine.completed_count_today(), 1);

    engine.start_focus();
    for _ in 0..4 {
        engine.tick(noon());
    }
    engine.skip();
    assert_eq!(engine.completed_count_today(), 1);
    assert_eq!(engine.progress(), 0.0);
}
