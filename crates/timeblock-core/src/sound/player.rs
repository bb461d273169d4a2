//! One-shot and looping playback on top of an [`AudioSink`].
//!
//! At most one alarm loop exists per player. Starting anything new stops
//! whatever is already sounding, and `stop` releases every voice still
//! held by the sink.

use tracing::{debug, warn};

use super::profile::ToneDescriptor;
use super::sink::AudioSink;
use super::synth::{schedule_pattern, ScheduledVoice};

pub const DEFAULT_LOOP_INTERVAL_SECS: f64 = 2.0;
const MIN_LOOP_INTERVAL_SECS: f64 = 0.1;

#[derive(Debug)]
struct AlarmLoop {
    tones: Vec<ToneDescriptor>,
    next_at: f64,
}

pub struct SoundPlayer {
    sink: Box<dyn AudioSink>,
    voices: Vec<ScheduledVoice>,
    alarm: Option<AlarmLoop>,
    loop_interval: f64,
}

impl SoundPlayer {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            voices: Vec::new(),
            alarm: None,
            loop_interval: DEFAULT_LOOP_INTERVAL_SECS,
        }
    }

    pub fn with_loop_interval(mut self, secs: f64) -> Self {
        self.loop_interval = secs.max(MIN_LOOP_INTERVAL_SECS);
        self
    }

    pub fn is_looping(&self) -> bool {
        self.alarm.is_some()
    }

    /// Voices handed to the sink that have not been released or finished.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Play a pattern once. Returns whether anything was scheduled.
    pub fn play_once(&mut self, tones: &[ToneDescriptor], audible: bool) -> bool {
        self.stop();
        if !audible {
            debug!("sound suppressed: surface not audible");
            return false;
        }
        let now = self.sink.current_time();
        self.play_at(tones, now)
    }

    /// Start a looping alarm. The loop is only armed if the surface is
    /// audible and the first repetition reached the sink.
    pub fn start_loop(&mut self, tones: Vec<ToneDescriptor>, audible: bool) -> bool {
        self.stop();
        if !audible {
            debug!("alarm suppressed: surface not audible");
            return false;
        }
        let now = self.sink.current_time();
        if !self.play_at(&tones, now) {
            return false;
        }
        self.alarm = Some(AlarmLoop {
            tones,
            next_at: now + self.loop_interval,
        });
        true
    }

    /// Fire a due loop repetition. Audibility is checked per repetition; a
    /// muted repetition is skipped but the loop stays armed.
    pub fn poll(&mut self, audible: bool) {
        let now = self.sink.current_time();
        self.voices.retain(|v| v.ends_at > now);

        let interval = self.loop_interval;
        let due = match self.alarm.as_mut() {
            Some(alarm) if alarm.next_at <= now => {
                while alarm.next_at <= now {
                    alarm.next_at += interval;
                }
                Some(alarm.tones.clone())
            }
            _ => None,
        };

        if let Some(tones) = due {
            if audible {
                self.play_at(&tones, now);
            } else {
                debug!("alarm repetition muted");
            }
        }
    }

    /// Cancel the loop and release every scheduled voice.
    pub fn stop(&mut self) {
        self.alarm = None;
        for voice in self.voices.drain(..) {
            if let Err(e) = self.sink.stop_voice(voice.id) {
                warn!(voice = voice.id, error = %e, "failed to stop voice");
            }
        }
    }

    fn play_at(&mut self, tones: &[ToneDescriptor], start_at: f64) -> bool {
        match schedule_pattern(self.sink.as_mut(), tones, start_at) {
            Ok(voices) => {
                self.voices.extend(voices);
                true
            }
            Err(e) => {
                warn!(error = %e, "audio playback failed");
                false
            }
        }
    }
}

impl Drop for SoundPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundPlayer")
            .field("voices", &self.voices.len())
            .field("looping", &self.alarm.is_some())
            .field("loop_interval", &self.loop_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::SoundProfile;
    use crate::testing::RecordingSink;

    #[test]
    fn loop_repeats_every_interval() {
        let sink = RecordingSink::new();
        let mut player = SoundPlayer::new(Box::new(sink.clone()));
        assert!(player.start_loop(SoundProfile::Beep.pattern(), true));
        assert_eq!(sink.scheduled_count(), 2);

        sink.set_time(1.0);
        player.poll(true);
        assert_eq!(sink.scheduled_count(), 2);

        sink.set_time(2.0);
        player.poll(true);
        assert_eq!(sink.scheduled_count(), 4);
        assert_eq!(sink.pattern_starts(), vec![0.0, 2.0]);
    }

    #[test]
    fn muted_repetition_keeps_loop_armed() {
        let sink = RecordingSink::new();
        let mut player = SoundPlayer::new(Box::new(sink.clone()));
        player.start_loop(SoundProfile::Beep.pattern(), true);

        sink.set_time(2.0);
        player.poll(false);
        assert_eq!(sink.scheduled_count(), 2);
        assert!(player.is_looping());

        sink.set_time(4.0);
        player.poll(true);
        assert_eq!(sink.scheduled_count(), 4);
    }

    #[test]
    fn inaudible_start_never_arms() {
        let sink = RecordingSink::new();
        let mut player = SoundPlayer::new(Box::new(sink.clone()));
        assert!(!player.start_loop(SoundProfile::Chime.pattern(), false));
        assert!(!player.is_looping());
        assert_eq!(sink.scheduled_count(), 0);
    }

    #[test]
    fn stop_releases_pending_voices() {
        let sink = RecordingSink::new();
        let mut player = SoundPlayer::new(Box::new(sink.clone()));
        player.start_loop(SoundProfile::Chime.pattern(), true);
        assert_eq!(player.active_voices(), 3);

        player.stop();
        assert!(!player.is_looping());
        assert_eq!(player.active_voices(), 0);
        assert_eq!(sink.live_voices(), 0);

        sink.set_time(10.0);
        player.poll(true);
        assert_eq!(sink.scheduled_count(), 3);
    }

    #[test]
    fn failing_sink_does_not_arm_loop() {
        let sink = RecordingSink::failing();
        let mut player = SoundPlayer::new(Box::new(sink.clone()));
        assert!(!player.start_loop(SoundProfile::Beep.pattern(), true));
        assert!(!player.is_looping());
    }

    #[test]
    fn silent_sink_plays_nothing() {
        let mut player = SoundPlayer::new(Box::new(crate::sound::SilentSink));
        assert!(!player.play_once(&SoundProfile::Beep.pattern(), true));
        assert!(!player.start_loop(SoundProfile::Beep.pattern(), true));
        assert_eq!(player.active_voices(), 0);
    }

    #[test]
    fn drop_releases_voices() {
        let sink = RecordingSink::new();
        {
            let mut player = SoundPlayer::new(Box::new(sink.clone()));
            player.start_loop(SoundProfile::Electronic.pattern(), true);
            assert_eq!(sink.live_voices(), 2);
        }
        assert_eq!(sink.live_voices(), 0);
    }
}
