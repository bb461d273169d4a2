//! Offline rendering of tone patterns to mono PCM.

use std::f32::consts::TAU;

use super::profile::{pattern_length, ToneDescriptor, Waveform};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

fn oscillator(waveform: Waveform, phase: f32) -> f32 {
    // phase in [0, 1)
    match waveform {
        Waveform::Sine => (phase * TAU).sin(),
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
    }
}

fn render_tone(tone: &ToneDescriptor, sample_rate: u32, out: &mut [f32]) {
    let sr = sample_rate as f32;
    let first = (tone.offset_secs * sr).round() as usize;
    let count = (tone.duration_secs * sr).round() as usize;
    let mut phase = 0.0f32;

    for (n, sample) in out.iter_mut().skip(first).take(count).enumerate() {
        let t = n as f32 / sr;
        *sample += oscillator(tone.waveform, phase) * tone.gain_at(t);
        phase = (phase + tone.frequency_at(t) / sr).fract();
    }
}

/// Mix a pattern into one buffer, hard-limited to [-1, 1].
pub fn render_pattern(tones: &[ToneDescriptor], sample_rate: u32) -> Vec<f32> {
    let len = (pattern_length(tones) * sample_rate as f32).round() as usize;
    let mut out = vec![0.0f32; len];
    for tone in tones {
        render_tone(tone, sample_rate, &mut out);
    }
    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}
