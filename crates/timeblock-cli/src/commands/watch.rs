use std::ops::ControlFlow;

use chrono::Utc;
use timeblock_core::schedule::resolve;
use timeblock_core::sound::{AudioSink, SilentSink};
use timeblock_core::{
    AlertController, Clock, Config, DayTracker, Event, LogNotifier, Notifier, Runtime,
    SoundPlayer, SystemClock,
};

use super::{open_store, print_json_line, tick_runtime};
use crate::terminal::{stdin_commands, StderrNotifier, TerminalBell, TerminalVisibility};

pub fn run(floating: bool, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let schedule = config.validated_schedule()?;

    let (sink, notifier): (Box<dyn AudioSink>, Box<dyn Notifier>) = if quiet {
        (Box::new(SilentSink), Box::new(LogNotifier))
    } else {
        (Box::new(TerminalBell::new()), Box::new(StderrNotifier))
    };
    let player = SoundPlayer::new(sink)
        .with_loop_interval(f64::from(config.alerts.loop_interval_secs));
    let mut alerts = AlertController::new(
        player,
        notifier,
        Box::new(TerminalVisibility),
        open_store(),
    )
    .with_notifications(config.alerts.notifications_enabled);
    alerts.set_floating_surface(floating || config.alerts.floating_surface);

    print_json_line(&Event::BlockSnapshot {
        state: resolve(&schedule, SystemClock.now()),
        at: Utc::now(),
    });

    let tracker = DayTracker::new(schedule, alerts);
    let mut runtime = Runtime::new(SystemClock).with_day_tracker(tracker);

    eprintln!("press Enter to dismiss an alert, Ctrl-C to stop");
    tick_runtime()?.block_on(runtime.run(
        stdin_commands(),
        |event| {
            print_json_line(event);
            ControlFlow::Continue(())
        },
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        },
    ));
    eprintln!("stopped");
    Ok(())
}
