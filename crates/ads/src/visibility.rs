//! Background/foreground tracking for app-open ads.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Records when the app went to the background and decides, on return,
/// whether it was away long enough for an app-open ad.
///
/// Each background timestamp is consumed by the next foreground check, so a
/// single away period never triggers more than one ad.
pub struct VisibilityWatcher {
    threshold: Duration,
    last_backgrounded_at: Mutex<Option<Instant>>,
}

impl VisibilityWatcher {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_backgrounded_at: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Instant>> {
        self.last_backgrounded_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mark_backgrounded(&self, at: Instant) {
        *self.lock() = Some(at);
    }

    /// Consume the pending background timestamp and report whether the time
    /// away strictly exceeded the threshold.
    pub fn check_foregrounded(&self, at: Instant) -> bool {
        match self.lock().take() {
            Some(since) => at.saturating_duration_since(since) > self.threshold,
            None => false,
        }
    }

    pub fn last_backgrounded_at(&self) -> Option<Instant> {
        *self.lock()
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }
}
