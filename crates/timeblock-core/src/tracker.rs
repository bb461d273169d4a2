//! One tick of the day: resolve, detect, alert.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::alert::AlertController;
use crate::events::Event;
use crate::schedule::{resolve, ResolvedState, Schedule};
use crate::transition::{Transition, TransitionDetector};

/// Result of a single schedule tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub state: ResolvedState,
    pub transition: Option<Transition>,
    /// Transition and alert events, in the order they happened.
    pub events: Vec<Event>,
}

/// Drives schedule resolution, transition detection and alerts in that
/// fixed order against one schedule.
#[derive(Debug)]
pub struct DayTracker {
    schedule: Schedule,
    detector: TransitionDetector,
    alerts: AlertController,
}

impl DayTracker {
    pub fn new(schedule: Schedule, alerts: AlertController) -> Self {
        Self {
            schedule,
            detector: TransitionDetector::new(),
            alerts,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn alerts(&self) -> &AlertController {
        &self.alerts
    }

    /// Swap in a new block list. Takes effect on the next tick; a block whose
    /// id survives the swap is not reported as a transition.
    pub fn replace_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
    }

    pub fn tick(&mut self, now: NaiveDateTime) -> TickReport {
        let exiting = self.detector.last_block().cloned();
        let state = resolve(&self.schedule, now);
        let transition = self.detector.observe(state.current_block.clone(), now);

        let mut events = Vec::new();
        if let Some(t) = &transition {
            events.push(Event::BlockTransition {
                from_block: t.from.as_ref().map(|b| b.id.clone()),
                to_block: t.to.as_ref().map(|b| b.id.clone()),
                local_time: now,
                at: Utc::now(),
            });
        }
        events.extend(self.alerts.on_tick(
            &self.schedule,
            exiting.as_ref(),
            state.current_block.as_ref(),
            transition.as_ref(),
            now,
        ));

        TickReport {
            state,
            transition,
            events,
        }
    }

    pub fn dismiss(&mut self) -> Option<Event> {
        self.alerts.dismiss()
    }

    pub fn shutdown(&mut self) {
        self.alerts.shutdown();
    }
}
