//! Recording and failing implementations of the port traits.
//!
//! Clones share state, so a test can hand one clone to the code under test
//! and inspect the other.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::alert::Visibility;
use crate::error::{NotifyError, SoundError, StorageError};
use crate::notify::Notifier;
use crate::sound::{AudioSink, ToneDescriptor, VoiceId};
use crate::storage::KeyValueStore;

#[derive(Debug, Default)]
struct SinkLog {
    time: f64,
    next_id: VoiceId,
    scheduled: Vec<(VoiceId, f64)>,
    stopped: HashSet<VoiceId>,
    fail: bool,
}

/// Audio sink with a hand-driven timeline that records every voice.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<SinkLog>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every tone.
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.log.borrow_mut().fail = true;
        sink
    }

    pub fn set_time(&self, secs: f64) {
        self.log.borrow_mut().time = secs;
    }

    pub fn scheduled_count(&self) -> usize {
        self.log.borrow().scheduled.len()
    }

    /// Start time of each pattern repetition, in order.
    pub fn pattern_starts(&self) -> Vec<f64> {
        let mut starts: Vec<f64> = Vec::new();
        for &(_, start) in &self.log.borrow().scheduled {
            if starts.last() != Some(&start) {
                starts.push(start);
            }
        }
        starts
    }

    /// Voices scheduled and not yet stopped.
    pub fn live_voices(&self) -> usize {
        let log = self.log.borrow();
        log.scheduled
            .iter()
            .filter(|(id, _)| !log.stopped.contains(id))
            .count()
    }
}

impl AudioSink for RecordingSink {
    fn current_time(&self) -> f64 {
        self.log.borrow().time
    }

    fn schedule_tone(&mut self, _tone: &ToneDescriptor, pattern_start: f64) -> Result<VoiceId, SoundError> {
        let mut log = self.log.borrow_mut();
        if log.fail {
            return Err(SoundError::Unsupported("recording sink set to fail".into()));
        }
        log.next_id += 1;
        let id = log.next_id;
        log.scheduled.push((id, pattern_start));
        Ok(id)
    }

    fn stop_voice(&mut self, voice: VoiceId) -> Result<(), SoundError> {
        self.log.borrow_mut().stopped.insert(voice);
        Ok(())
    }
}

/// Keeps every (title, body) pair it is asked to deliver.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.sent
            .borrow_mut()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::PermissionDenied)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedVisibility(pub bool);

impl Visibility for FixedVisibility {
    fn page_visible(&self) -> bool {
        self.0
    }
}

/// Store whose every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("store offline".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("store offline".into()))
    }
}
