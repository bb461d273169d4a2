//! Periodic drivers for the day tracker and the pomodoro engine.
//!
//! Both loops run at 1 Hz on independent intervals inside a single task.
//! Nothing is spawned, so the ports may hold non-`Send` state. User input
//! arrives as [`Command`]s on a channel polled by the same loop.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::events::Event;
use crate::pomodoro::PomodoroEngine;
use crate::tracker::DayTracker;

const TICK: Duration = Duration::from_secs(1);

/// User input forwarded into a running loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Hide the current alert and silence the alarm.
    Dismiss,
    Pause,
    Resume,
    Stop,
    Skip,
}

pub struct Runtime<C: Clock> {
    clock: C,
    tracker: Option<DayTracker>,
    pomodoro: Option<PomodoroEngine>,
}

impl<C: Clock> Runtime<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            tracker: None,
            pomodoro: None,
        }
    }

    pub fn with_day_tracker(mut self, tracker: DayTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn with_pomodoro(mut self, engine: PomodoroEngine) -> Self {
        self.pomodoro = Some(engine);
        self
    }

    pub fn tracker(&self) -> Option<&DayTracker> {
        self.tracker.as_ref()
    }

    pub fn pomodoro(&self) -> Option<&PomodoroEngine> {
        self.pomodoro.as_ref()
    }

    /// Tick until `shutdown` resolves or `on_event` breaks.
    ///
    /// Commands are applied between ticks. A closed command channel only
    /// stops input; the loops keep running. On return both loops are
    /// stopped and any looping alarm is silenced.
    pub async fn run<F, S>(
        &mut self,
        mut commands: mpsc::Receiver<Command>,
        mut on_event: F,
        shutdown: S,
    ) where
        F: FnMut(&Event) -> ControlFlow<()>,
        S: Future<Output = ()>,
    {
        let mut schedule_tick = interval(TICK);
        schedule_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut pomodoro_tick = interval(TICK);
        pomodoro_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);
        let mut accepting = true;

        info!(
            schedule = self.tracker.is_some(),
            pomodoro = self.pomodoro.is_some(),
            "runtime started"
        );

        loop {
            let flow = tokio::select! {
                _ = &mut shutdown => {
                    debug!("shutdown requested");
                    break;
                }
                _ = schedule_tick.tick(), if self.tracker.is_some() => {
                    let now = self.clock.now();
                    match self.tracker.as_mut() {
                        Some(tracker) => emit(&tracker.tick(now).events, &mut on_event),
                        None => ControlFlow::Continue(()),
                    }
                }
                command = commands.recv(), if accepting => match command {
                    Some(command) => match self.apply(command) {
                        Some(event) => on_event(&event),
                        None => ControlFlow::Continue(()),
                    },
                    None => {
                        debug!("command channel closed");
                        accepting = false;
                        ControlFlow::Continue(())
                    }
                },
                _ = pomodoro_tick.tick(), if self.pomodoro.is_some() => {
                    let now = self.clock.now();
                    match self.pomodoro.as_mut().and_then(|p| p.tick(now)) {
                        Some(event) => on_event(&event),
                        None => ControlFlow::Continue(()),
                    }
                }
            };
            if flow.is_break() {
                break;
            }
        }

        self.shutdown();
    }

    /// Route a command to the engine that owns it. Commands for an engine
    /// the runtime was built without are ignored.
    pub fn apply(&mut self, command: Command) -> Option<Event> {
        debug!(?command, "command received");
        match command {
            Command::Dismiss => self.tracker.as_mut().and_then(DayTracker::dismiss),
            Command::Pause => self.pomodoro.as_mut().and_then(PomodoroEngine::pause),
            Command::Resume => self.pomodoro.as_mut().and_then(PomodoroEngine::resume),
            Command::Stop => self.pomodoro.as_mut().and_then(PomodoroEngine::stop),
            Command::Skip => self.pomodoro.as_mut().and_then(PomodoroEngine::skip),
        }
    }

    /// Stop both engines and release audio.
    pub fn shutdown(&mut self) {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.shutdown();
        }
        if let Some(pomodoro) = self.pomodoro.as_mut() {
            pomodoro.shutdown();
        }
        info!("runtime stopped");
    }
}

fn emit<F>(events: &[Event], on_event: &mut F) -> ControlFlow<()>
where
    F: FnMut(&Event) -> ControlFlow<()>,
{
    for event in events {
        if on_event(event).is_break() {
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{AlertController, AlertKind};
    use crate::clock::ManualClock;
    use crate::error::SoundError;
    use crate::notify::NullNotifier;
    use crate::pomodoro::{PomodoroDurations, PomodoroPhase};
    use crate::schedule::{ClockTime, Schedule, TimeBlock};
    use crate::sound::{AudioSink, SoundPlayer, ToneDescriptor, VoiceId};
    use crate::storage::MemoryStore;
    use crate::testing::{FixedVisibility, RecordingSink};
    use chrono::{NaiveDate, NaiveDateTime};

    /// Recording sink whose timeline follows tokio's (paused) clock.
    struct TokioTimeSink {
        inner: RecordingSink,
        origin: tokio::time::Instant,
    }

    impl AudioSink for TokioTimeSink {
        fn current_time(&self) -> f64 {
            self.origin.elapsed().as_secs_f64()
        }

        fn schedule_tone(&mut self, tone: &ToneDescriptor, pattern_start: f64) -> Result<VoiceId, SoundError> {
            self.inner.schedule_tone(tone, pattern_start)
        }

        fn stop_voice(&mut self, voice: VoiceId) -> Result<(), SoundError> {
            self.inner.stop_voice(voice)
        }
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn one_block() -> Schedule {
        Schedule::new(vec![TimeBlock::new(
            "a",
            "A",
            ClockTime::new(9, 0),
            ClockTime::new(10, 0),
            "work",
        )])
    }

    fn alerts(sink: Box<dyn AudioSink>) -> AlertController {
        AlertController::new(
            SoundPlayer::new(sink),
            Box::new(NullNotifier),
            Box::new(FixedVisibility(true)),
            Box::new(MemoryStore::new()),
        )
    }

    fn pomodoro(focus_secs: u64) -> PomodoroEngine {
        let durations = PomodoroDurations {
            focus_secs,
            ..PomodoroDurations::default()
        };
        PomodoroEngine::new(
            durations,
            Box::new(MemoryStore::new()),
            Box::new(NullNotifier),
            at(12, 0, 0).date(),
        )
    }

    /// A receiver whose sender has already gone away.
    fn no_commands() -> mpsc::Receiver<Command> {
        mpsc::channel(1).1
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_silences_alarm() {
        let sink = RecordingSink::new();
        let clock = ManualClock::new(at(8, 59, 59)).with_step(chrono::Duration::seconds(1));
        let mut runtime =
            Runtime::new(clock).with_day_tracker(DayTracker::new(one_block(), alerts(Box::new(sink.clone()))));

        let mut kinds = Vec::new();
        runtime
            .run(
                no_commands(),
                |event| {
                    if let Event::AlertRaised { kind, .. } = event {
                        kinds.push(*kind);
                    }
                    ControlFlow::Continue(())
                },
                tokio::time::sleep(Duration::from_millis(2500)),
            )
            .await;

        assert_eq!(kinds, vec![AlertKind::Start]);
        let tracker = runtime.tracker().unwrap();
        assert!(!tracker.alerts().is_alarm_sounding());
        assert_eq!(sink.live_voices(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_command_ends_alarm_repetitions() {
        let recorded = RecordingSink::new();
        let sink = TokioTimeSink {
            inner: recorded.clone(),
            origin: tokio::time::Instant::now(),
        };
        let clock = ManualClock::new(at(8, 59, 59)).with_step(chrono::Duration::seconds(1));
        let mut runtime =
            Runtime::new(clock).with_day_tracker(DayTracker::new(one_block(), alerts(Box::new(sink))));
        let (tx, rx) = mpsc::channel(4);

        let mut starts_at_dismiss = None;
        let run = runtime.run(
            rx,
            |event| {
                if let Event::AlertDismissed { .. } = event {
                    starts_at_dismiss = Some(recorded.pattern_starts().len());
                }
                ControlFlow::Continue(())
            },
            tokio::time::sleep(Duration::from_secs(60)),
        );
        let user = async {
            tokio::time::sleep(Duration::from_millis(6500)).await;
            tx.send(Command::Dismiss).await.unwrap();
        };
        tokio::join!(run, user);

        let at_dismiss = starts_at_dismiss.expect("dismiss produced no event");
        assert!(at_dismiss >= 2, "alarm never repeated before dismissal");
        assert_eq!(recorded.pattern_starts().len(), at_dismiss);
        assert!(!runtime.tracker().unwrap().alerts().alert().is_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn pomodoro_loop_stops_on_break() {
        let mut engine = pomodoro(3);
        engine.start_focus();
        let clock = ManualClock::new(at(12, 0, 0)).with_step(chrono::Duration::seconds(1));
        let mut runtime = Runtime::new(clock).with_pomodoro(engine);

        runtime
            .run(
                no_commands(),
                |event| match event {
                    Event::PomodoroPhaseCompleted { .. } => ControlFlow::Break(()),
                    _ => ControlFlow::Continue(()),
                },
                std::future::pending(),
            )
            .await;

        let engine = runtime.pomodoro().unwrap();
        assert_eq!(engine.completed_count_today(), 1);
        assert_eq!(engine.phase(), PomodoroPhase::Break);
        assert!(!engine.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn skip_command_abandons_focus_uncounted() {
        let mut engine = pomodoro(1500);
        engine.start_focus();
        let clock = ManualClock::new(at(12, 0, 0)).with_step(chrono::Duration::seconds(1));
        let mut runtime = Runtime::new(clock).with_pomodoro(engine);
        let (tx, rx) = mpsc::channel(4);
        tx.send(Command::Pause).await.unwrap();
        tx.send(Command::Skip).await.unwrap();

        let mut seen = Vec::new();
        runtime
            .run(
                rx,
                |event| match event {
                    Event::PomodoroSkipped { phase, .. } => {
                        seen.push(*phase);
                        ControlFlow::Break(())
                    }
                    _ => ControlFlow::Continue(()),
                },
                tokio::time::sleep(Duration::from_secs(10)),
            )
            .await;

        assert_eq!(seen, vec![PomodoroPhase::Focus]);
        let engine = runtime.pomodoro().unwrap();
        assert_eq!(engine.phase(), PomodoroPhase::Idle);
        assert_eq!(engine.completed_count_today(), 0);
    }

    #[test]
    fn commands_without_their_engine_are_ignored() {
        let mut runtime = Runtime::new(ManualClock::new(at(9, 0, 0)));
        assert!(runtime.apply(Command::Dismiss).is_none());
        assert!(runtime.apply(Command::Skip).is_none());
    }
}
