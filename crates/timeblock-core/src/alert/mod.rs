//! Block start/end alerts and the alarm loop.

mod controller;
mod state;

pub use controller::{AlertController, AlwaysVisible, Visibility};
pub use state::{AlertControllerState, AlertKind, AlertState, OccurrenceKey};
