//! User-facing notification port.
//!
//! Delivery is best-effort everywhere: callers log a failure and carry on.

use tracing::{info, warn};

use crate::error::NotifyError;

pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Emits notifications as log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(target: "timeblock::notification", %title, %body, "notification");
        Ok(())
    }
}

/// Send through `notifier`, swallowing and logging any failure.
pub(crate) fn notify_best_effort(notifier: &dyn Notifier, title: &str, body: &str) {
    if let Err(e) = notifier.notify(title, body) {
        warn!(error = %e, %title, "notification failed");
    }
}
