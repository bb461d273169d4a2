use clap::Subcommand;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;
use timeblock_core::sound::{pattern_length, render_pattern, DEFAULT_SAMPLE_RATE};
use timeblock_core::{AlertController, AlwaysVisible, SoundPlayer, SoundProfile};

use super::open_store;
use crate::terminal::{StderrNotifier, TerminalBell};

#[derive(Subcommand)]
pub enum SoundAction {
    /// List alarm profiles, marking the selected one
    List,
    /// Select the alarm profile and preview it
    Set {
        /// beep, chime or electronic
        name: String,
    },
    /// Play a profile once without selecting it
    Preview {
        name: String,
    },
    /// Write one repetition of a profile to a WAV file
    Render {
        name: String,
        file: String,
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },
}

fn controller() -> AlertController {
    AlertController::new(
        SoundPlayer::new(Box::new(TerminalBell::new())),
        Box::new(StderrNotifier),
        Box::new(AlwaysVisible),
        open_store(),
    )
}

pub fn run(action: SoundAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SoundAction::List => {
            let selected = controller().sound_profile();
            for profile in SoundProfile::ALL {
                let marker = if profile == selected { "*" } else { " " };
                let secs = pattern_length(&profile.pattern());
                println!("{marker} {:<10} {secs:.2}s", profile.as_str());
            }
        }
        SoundAction::Set { name } => {
            let profile: SoundProfile = name.parse()?;
            let event = controller().change_sound_profile(profile);
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        SoundAction::Preview { name } => {
            let profile: SoundProfile = name.parse()?;
            let mut player = SoundPlayer::new(Box::new(TerminalBell::new()));
            player.play_once(&profile.pattern(), true);
            println!("{profile}");
        }
        SoundAction::Render {
            name,
            file,
            sample_rate,
        } => {
            let profile: SoundProfile = name.parse()?;
            let samples = render_pattern(&profile.pattern(), sample_rate);
            write_wav(Path::new(&file), &samples, sample_rate)?;
            println!("wrote {} samples to {file}", samples.len());
        }
    }
    Ok(())
}

fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)?;
    }
    writer.finalize()
}
