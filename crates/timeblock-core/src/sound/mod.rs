//! Tone patterns, the audio-sink port, and looping playback.

mod player;
mod profile;
mod render;
mod sink;
mod synth;

pub use player::{SoundPlayer, DEFAULT_LOOP_INTERVAL_SECS};
pub use profile::{completion_chime, pattern_length, Decay, SoundProfile, ToneDescriptor, Waveform};
pub use render::{render_pattern, DEFAULT_SAMPLE_RATE};
pub use sink::{AudioSink, SilentSink, VoiceId};
pub use synth::{schedule_pattern, ScheduledVoice};
