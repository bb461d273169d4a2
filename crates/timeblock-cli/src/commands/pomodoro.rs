use std::ops::ControlFlow;

use clap::Subcommand;
use serde_json::json;
use timeblock_core::pomodoro::{PomodoroPhase, SessionHistory};
use timeblock_core::{Clock, Config, Event, PomodoroEngine, Runtime, SoundPlayer, SystemClock};

use super::{open_store, print_json_line, tick_runtime};
use crate::terminal::{stdin_commands, StderrNotifier, TerminalBell};

#[derive(Subcommand)]
pub enum PomodoroAction {
    /// Run one pomodoro cycle in the foreground.
    ///
    /// Reads p/r/s/x lines from stdin to pause, resume, skip or stop.
    Run {
        /// Start with a short break instead of focus
        #[arg(long = "break", conflicts_with = "long_break")]
        short_break: bool,
        /// Start with a long break instead of focus
        #[arg(long)]
        long_break: bool,
    },
    /// Today's completed count and recent history
    Stats,
}

pub fn run(action: PomodoroAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PomodoroAction::Run {
            short_break,
            long_break,
        } => run_cycle(short_break, long_break),
        PomodoroAction::Stats => {
            let store = open_store();
            let history = SessionHistory::load(store.as_ref())?;
            let today = SystemClock.now().date();
            let stats = json!({
                "date": today,
                "completed_today": history.completed_on(today),
                "history": history.days(),
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

fn run_cycle(short_break: bool, long_break: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut engine = PomodoroEngine::new(
        config.pomodoro.durations(),
        open_store(),
        Box::new(StderrNotifier),
        SystemClock.now().date(),
    )
    .with_sound(SoundPlayer::new(Box::new(TerminalBell::new())));

    let started = if short_break || long_break {
        engine.start_break(long_break)
    } else {
        engine.start_focus()
    };
    if let Some(event) = started {
        print_json_line(&event);
    }

    let mut runtime = Runtime::new(SystemClock).with_pomodoro(engine);
    eprintln!("keys: p pause, r resume, s skip, x stop (each followed by Enter)");
    tick_runtime()?.block_on(runtime.run(
        stdin_commands(),
        |event| {
            print_json_line(event);
            match event {
                Event::PomodoroPhaseCompleted {
                    next: PomodoroPhase::Idle,
                    ..
                }
                | Event::PomodoroStopped { .. }
                | Event::PomodoroSkipped { .. } => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        },
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        },
    ));

    if let Some(engine) = runtime.pomodoro() {
        print_json_line(&engine.snapshot());
    }
    Ok(())
}
