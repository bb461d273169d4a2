use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use tracing::{debug, info, warn};

use super::state::{AlertControllerState, AlertKind, AlertState, OccurrenceKey};
use crate::events::Event;
use crate::notify::{notify_best_effort, Notifier};
use crate::schedule::{minute_of_day, resolve_next_block, TimeBlock};
use crate::sound::{SoundPlayer, SoundProfile};
use crate::storage::{KeyValueStore, SOUND_PROFILE_KEY};
use crate::transition::Transition;

/// Occurrence keys older than this many days are forgotten.
const FIRED_RETENTION_DAYS: i64 = 2;

/// Whether the hosting surface is currently in the foreground.
pub trait Visibility {
    fn page_visible(&self) -> bool;
}

/// A terminal or window that is always considered in front.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysVisible;

impl Visibility for AlwaysVisible {
    fn page_visible(&self) -> bool {
        true
    }
}

/// Raises "block started" and "block ended" alerts exactly once per
/// occurrence and owns the single alarm loop.
pub struct AlertController {
    state: AlertControllerState,
    player: SoundPlayer,
    notifier: Box<dyn Notifier>,
    visibility: Box<dyn Visibility>,
    prefs: Box<dyn KeyValueStore>,
    floating_surface: bool,
    notifications_enabled: bool,
}

impl AlertController {
    pub fn new(
        player: SoundPlayer,
        notifier: Box<dyn Notifier>,
        visibility: Box<dyn Visibility>,
        prefs: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            state: AlertControllerState::default(),
            player,
            notifier,
            visibility,
            prefs,
            floating_surface: false,
            notifications_enabled: true,
        }
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    /// A floating always-on-top surface keeps the alarm audible while the
    /// page itself is hidden.
    pub fn set_floating_surface(&mut self, floating: bool) {
        self.floating_surface = floating;
    }

    pub fn alert(&self) -> &AlertState {
        &self.state.alert
    }

    pub fn controller_state(&self) -> &AlertControllerState {
        &self.state
    }

    pub fn is_alarm_sounding(&self) -> bool {
        self.player.is_looping()
    }

    fn audible(&self) -> bool {
        self.floating_surface || self.visibility.page_visible()
    }

    /// Stored alarm profile; unreadable or unknown values fall back to beep.
    pub fn sound_profile(&self) -> SoundProfile {
        match self.prefs.get(SOUND_PROFILE_KEY) {
            Ok(value) => SoundProfile::from_stored(value.as_deref()),
            Err(e) => {
                warn!(error = %e, "sound preference unavailable");
                SoundProfile::default()
            }
        }
    }

    /// Persist a new profile and play it once.
    pub fn change_sound_profile(&mut self, profile: SoundProfile) -> Event {
        if let Err(e) = self.prefs.set(SOUND_PROFILE_KEY, profile.as_str()) {
            warn!(error = %e, "failed to persist sound preference");
        }
        let audible = self.audible();
        self.player.play_once(&profile.pattern(), audible);
        info!(%profile, "sound profile changed");
        Event::SoundProfileChanged {
            profile,
            at: Utc::now(),
        }
    }

    /// Evaluate both triggers for one tick.
    ///
    /// `exiting` is the block resolved on the previous tick, `current` the
    /// block resolved for `now`. The end trigger is checked first so that a
    /// back-to-back start leaves its own alert on screen.
    pub fn on_tick(
        &mut self,
        schedule: &[TimeBlock],
        exiting: Option<&TimeBlock>,
        current: Option<&TimeBlock>,
        transition: Option<&Transition>,
        now: NaiveDateTime,
    ) -> Vec<Event> {
        self.state
            .prune_before(now.date() - Duration::days(FIRED_RETENTION_DAYS));

        let mut events = Vec::new();

        if let Some(block) = exiting.or(current) {
            if is_end_instant(block, now) {
                let key = OccurrenceKey::new(
                    &block.id,
                    block.occurrence_date_ending_at(now),
                    AlertKind::End,
                );
                if self.state.mark_fired(key) {
                    let next = resolve_next_block(schedule, Some(block)).cloned();
                    events.push(self.raise(AlertKind::End, block.clone(), next, now));
                }
            }
        }

        if let Some(block) = transition.and_then(|t| t.to.as_ref()) {
            let key = OccurrenceKey::new(&block.id, block.occurrence_date(now), AlertKind::Start);
            if self.state.mark_fired(key) {
                let next = resolve_next_block(schedule, Some(block)).cloned();
                events.push(self.raise(AlertKind::Start, block.clone(), next, now));
            } else {
                debug!(block = %block.id, "start alert already fired for this occurrence");
            }
        }

        let audible = self.audible();
        self.player.poll(audible);
        events
    }

    /// Hide the alert and silence the alarm. Fired occurrences stay fired.
    pub fn dismiss(&mut self) -> Option<Event> {
        self.player.stop();
        if !self.state.alert.is_visible {
            return None;
        }
        self.state.alert = AlertState::default();
        info!("alert dismissed");
        Some(Event::AlertDismissed { at: Utc::now() })
    }

    /// Stop the alarm and release every voice.
    pub fn shutdown(&mut self) {
        self.player.stop();
    }

    fn raise(
        &mut self,
        kind: AlertKind,
        block: TimeBlock,
        next: Option<TimeBlock>,
        now: NaiveDateTime,
    ) -> Event {
        let (title, message) = match kind {
            AlertKind::Start => {
                let clock = block.start().to_12h();
                (
                    "Time Block Started",
                    format!("It's {clock}. Start {} now.", block.name),
                )
            }
            AlertKind::End => {
                let next_name = next.as_ref().map_or("None", |b| b.name.as_str());
                (
                    "Block Complete",
                    format!("{} is complete. Next: {next_name}", block.name),
                )
            }
        };

        let sound_started = if block.is_sleep() {
            self.player.stop();
            debug!(block = %block.id, "alarm skipped for sleep block");
            false
        } else {
            let audible = self.audible();
            let tones = self.sound_profile().pattern();
            let started = self.player.start_loop(tones, audible);
            if !started {
                debug!(block = %block.id, audible, "alarm did not start");
            }
            started
        };

        if self.notifications_enabled {
            notify_best_effort(self.notifier.as_ref(), title, &message);
        }

        info!(?kind, block = %block.id, sound_started, "alert raised");
        let block_id = block.id.clone();
        self.state.alert = AlertState {
            is_visible: true,
            kind: Some(kind),
            block: Some(block),
            next_block: next,
            message: message.clone(),
        };

        Event::AlertRaised {
            kind,
            block_id,
            message,
            sound_started,
            at: Utc::now(),
        }
    }
}

fn is_end_instant(block: &TimeBlock, now: NaiveDateTime) -> bool {
    now.second() == 0 && minute_of_day(now) == block.end().minutes_of_day()
}

impl std::fmt::Debug for AlertController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertController")
            .field("alert", &self.state.alert)
            .field("player", &self.player)
            .field("floating_surface", &self.floating_surface)
            .finish()
    }
}
