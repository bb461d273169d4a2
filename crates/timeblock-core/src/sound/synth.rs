use tracing::warn;

use super::profile::ToneDescriptor;
use super::sink::{AudioSink, VoiceId};
use crate::error::SoundError;

/// A tone handed to the sink, with the sink-time at which it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledVoice {
    pub id: VoiceId,
    pub ends_at: f64,
}

/// Schedule every tone of a pattern starting at `start_at` on the sink's
/// timeline.
///
/// Either the whole pattern is scheduled or nothing stays scheduled: on a
/// sink failure the voices already placed are stopped before returning.
pub fn schedule_pattern(
    sink: &mut dyn AudioSink,
    tones: &[ToneDescriptor],
    start_at: f64,
) -> Result<Vec<ScheduledVoice>, SoundError> {
    let mut voices = Vec::with_capacity(tones.len());
    for tone in tones {
        match sink.schedule_tone(tone, start_at) {
            Ok(id) => voices.push(ScheduledVoice {
                id,
                ends_at: start_at + f64::from(tone.end_secs()),
            }),
            Err(e) => {
                for voice in &voices {
                    if let Err(stop_err) = sink.stop_voice(voice.id) {
                        warn!(voice = voice.id, error = %stop_err, "failed to release voice");
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(voices)
}
