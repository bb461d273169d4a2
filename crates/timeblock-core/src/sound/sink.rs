//! Platform audio capability consumed by the synthesizer.

use super::profile::ToneDescriptor;
use crate::error::SoundError;

pub type VoiceId = u64;

/// Something that can schedule tones on its own timeline.
pub trait AudioSink {
    /// Current position of the sink's timeline in seconds.
    fn current_time(&self) -> f64;

    /// Schedule `tone` so that its offset is measured from `pattern_start`.
    fn schedule_tone(
        &mut self,
        tone: &ToneDescriptor,
        pattern_start: f64,
    ) -> Result<VoiceId, SoundError>;

    /// Stop a voice and release whatever the platform holds for it.
    /// Stopping a voice that already finished is not an error.
    fn stop_voice(&mut self, voice: VoiceId) -> Result<(), SoundError>;
}

/// Sink for environments with no audio at all.
#[derive(Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn current_time(&self) -> f64 {
        0.0
    }

    fn schedule_tone(&mut self, _tone: &ToneDescriptor, _pattern_start: f64) -> Result<VoiceId, SoundError> {
        Err(SoundError::Unsupported("no audio output".into()))
    }

    fn stop_voice(&mut self, _voice: VoiceId) -> Result<(), SoundError> {
        Ok(())
    }
}
