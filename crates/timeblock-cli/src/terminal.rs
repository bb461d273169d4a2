//! Terminal implementations of the core's audio, notification and
//! visibility ports.

use std::io::{BufRead, IsTerminal, Write};
use std::time::Instant;

use tokio::sync::mpsc;
use timeblock_core::error::{NotifyError, SoundError};
use timeblock_core::sound::{AudioSink, ToneDescriptor, VoiceId};
use timeblock_core::{Command, Notifier, Visibility};

/// Rings the terminal bell once per pattern repetition.
///
/// A terminal cannot synthesize tones, so only the first tone of each
/// pattern produces a bell; the rest are tracked as silent voices.
pub struct TerminalBell {
    started: Instant,
    next_voice: VoiceId,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            next_voice: 0,
        }
    }
}

impl AudioSink for TerminalBell {
    fn current_time(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn schedule_tone(&mut self, tone: &ToneDescriptor, _pattern_start: f64) -> Result<VoiceId, SoundError> {
        if tone.offset_secs == 0.0 {
            let mut err = std::io::stderr();
            err.write_all(b"\x07")
                .and_then(|()| err.flush())
                .map_err(|e| SoundError::Sink(e.to_string()))?;
        }
        self.next_voice += 1;
        Ok(self.next_voice)
    }

    fn stop_voice(&mut self, _voice: VoiceId) -> Result<(), SoundError> {
        Ok(())
    }
}

/// Prints notifications to stderr.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let mut err = std::io::stderr();
        writeln!(err, "[{title}] {body}").map_err(|e| NotifyError::Failed(e.to_string()))
    }
}

/// Treats a detached (non-tty) stderr as a hidden page.
pub struct TerminalVisibility;

impl Visibility for TerminalVisibility {
    fn page_visible(&self) -> bool {
        std::io::stderr().is_terminal()
    }
}

/// Map one line of stdin to a runtime command. An empty line dismisses.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "d" | "dismiss" => Some(Command::Dismiss),
        "p" | "pause" => Some(Command::Pause),
        "r" | "resume" => Some(Command::Resume),
        "s" | "skip" => Some(Command::Skip),
        "x" | "stop" => Some(Command::Stop),
        _ => None,
    }
}

/// Forward stdin lines as commands from a reader thread.
///
/// The channel closes at end of input; the receiver then stops polling it.
pub fn stdin_commands() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    break;
                }
            };
            match parse_command(&line) {
                Some(command) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("unknown key {:?} (Enter/d, p, r, s, x)", line.trim()),
            }
        }
    });
    rx
}
