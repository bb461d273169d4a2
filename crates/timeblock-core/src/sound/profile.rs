use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SoundError;

/// User-selectable alarm sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundProfile {
    #[default]
    Beep,
    Chime,
    Electronic,
}

impl SoundProfile {
    pub const ALL: [SoundProfile; 3] = [SoundProfile::Beep, SoundProfile::Chime, SoundProfile::Electronic];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundProfile::Beep => "beep",
            SoundProfile::Chime => "chime",
            SoundProfile::Electronic => "electronic",
        }
    }

    /// Parse a stored name, falling back to the default for anything unknown.
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// The fixed tone sequence for this profile.
    pub fn pattern(self) -> Vec<ToneDescriptor> {
        match self {
            SoundProfile::Beep => vec![
                ToneDescriptor::new(Waveform::Sine, 800.0, 0.0, 0.5, 0.8, Decay::Exponential { floor: 0.01 }),
                ToneDescriptor::new(Waveform::Sine, 1000.0, 0.2, 0.5, 0.8, Decay::Exponential { floor: 0.01 }),
            ],
            SoundProfile::Chime => C_MAJOR
                .iter()
                .enumerate()
                .map(|(i, &freq)| {
                    let offset = i as f32 * 0.1;
                    // Every note rings out to the same 3 s mark.
                    ToneDescriptor::new(Waveform::Triangle, freq, offset, 3.0 - offset, 0.6, Decay::Exponential { floor: 0.001 })
                })
                .collect(),
            SoundProfile::Electronic => vec![
                ToneDescriptor::new(Waveform::Square, 440.0, 0.0, 0.2, 0.5, Decay::Linear).with_glide(880.0, 0.1),
                ToneDescriptor::new(Waveform::Square, 880.0, 0.15, 0.2, 0.5, Decay::Linear).with_glide(1760.0, 0.1),
            ],
        }
    }
}

impl fmt::Display for SoundProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundProfile {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beep" => Ok(SoundProfile::Beep),
            "chime" => Ok(SoundProfile::Chime),
            "electronic" => Ok(SoundProfile::Electronic),
            other => Err(SoundError::UnknownProfile(other.to_string())),
        }
    }
}

/// C5, E5, G5.
const C_MAJOR: [f32; 3] = [523.25, 659.25, 783.99];

/// Soft triad played when a pomodoro phase finishes.
pub fn completion_chime() -> Vec<ToneDescriptor> {
    C_MAJOR
        .iter()
        .enumerate()
        .map(|(i, &freq)| {
            ToneDescriptor::new(Waveform::Sine, freq, i as f32 * 0.1, 0.8, 0.2, Decay::Exponential { floor: 0.01 })
                .with_attack(0.05)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

/// Gain curve from the peak to the end of the tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "lowercase")]
pub enum Decay {
    /// Exponential ramp down to `floor` (must be > 0).
    Exponential { floor: f32 },
    /// Straight line down to silence.
    Linear,
}

/// One scheduled tone, relative to the pattern start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneDescriptor {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    /// Linear pitch glide target and its duration.
    pub glide: Option<(f32, f32)>,
    pub offset_secs: f32,
    pub duration_secs: f32,
    pub peak_gain: f32,
    /// Linear rise from silence to `peak_gain`; zero starts at the peak.
    pub attack_secs: f32,
    pub decay: Decay,
}

impl ToneDescriptor {
    pub fn new(
        waveform: Waveform,
        frequency_hz: f32,
        offset_secs: f32,
        duration_secs: f32,
        peak_gain: f32,
        decay: Decay,
    ) -> Self {
        Self {
            waveform,
            frequency_hz,
            glide: None,
            offset_secs,
            duration_secs,
            peak_gain,
            attack_secs: 0.0,
            decay,
        }
    }

    pub fn with_glide(mut self, target_hz: f32, over_secs: f32) -> Self {
        self.glide = Some((target_hz, over_secs));
        self
    }

    pub fn with_attack(mut self, secs: f32) -> Self {
        self.attack_secs = secs;
        self
    }

    pub fn end_secs(&self) -> f32 {
        self.offset_secs + self.duration_secs
    }

    /// Instantaneous frequency `t` seconds into the tone.
    pub fn frequency_at(&self, t: f32) -> f32 {
        match self.glide {
            Some((target, over)) if over > 0.0 => {
                let u = (t / over).clamp(0.0, 1.0);
                self.frequency_hz + (target - self.frequency_hz) * u
            }
            _ => self.frequency_hz,
        }
    }

    /// Envelope gain `t` seconds into the tone.
    pub fn gain_at(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration_secs {
            return 0.0;
        }
        if t < self.attack_secs {
            return self.peak_gain * t / self.attack_secs;
        }
        let span = (self.duration_secs - self.attack_secs).max(f32::EPSILON);
        let u = ((t - self.attack_secs) / span).clamp(0.0, 1.0);
        match self.decay {
            Decay::Exponential { floor } => {
                let floor = floor.max(f32::MIN_POSITIVE);
                self.peak_gain * (floor / self.peak_gain).powf(u)
            }
            Decay::Linear => self.peak_gain * (1.0 - u),
        }
    }
}

/// Length of a tone sequence in seconds.
pub fn pattern_length(tones: &[ToneDescriptor]) -> f32 {
    tones.iter().map(ToneDescriptor::end_secs).fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_fixed() {
        assert_eq!(SoundProfile::Beep.pattern(), SoundProfile::Beep.pattern());
        assert_eq!(SoundProfile::Beep.pattern().len(), 2);
        assert_eq!(SoundProfile::Chime.pattern().len(), 3);
        assert_eq!(SoundProfile::Electronic.pattern().len(), 2);
    }

    #[test]
    fn chime_notes_end_together() {
        for tone in SoundProfile::Chime.pattern() {
            assert!((tone.end_secs() - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn pattern_lengths() {
        assert!((pattern_length(&SoundProfile::Beep.pattern()) - 0.7).abs() < 1e-6);
        assert!((pattern_length(&SoundProfile::Electronic.pattern()) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn parse_and_fallback() {
        assert_eq!("Chime".parse::<SoundProfile>().unwrap(), SoundProfile::Chime);
        assert!("siren".parse::<SoundProfile>().is_err());
        assert_eq!(SoundProfile::from_stored(Some("siren")), SoundProfile::Beep);
        assert_eq!(SoundProfile::from_stored(Some("electronic")), SoundProfile::Electronic);
        assert_eq!(SoundProfile::from_stored(None), SoundProfile::Beep);
    }

    #[test]
    fn envelope_shapes() {
        let beep = SoundProfile::Beep.pattern()[0];
        assert!((beep.gain_at(0.0) - 0.8).abs() < 1e-6);
        assert!(beep.gain_at(0.49) < 0.02);
        assert_eq!(beep.gain_at(0.5), 0.0);

        let blip = SoundProfile::Electronic.pattern()[0];
        assert!((blip.gain_at(0.1) - 0.25).abs() < 1e-4);
        assert!((blip.frequency_at(0.05) - 660.0).abs() < 1e-3);
        assert!((blip.frequency_at(0.15) - 880.0).abs() < 1e-3);

        let soft = completion_chime()[0];
        assert_eq!(soft.gain_at(0.0), 0.0);
        assert!((soft.gain_at(0.05) - 0.2).abs() < 1e-6);
    }
}
