//! Where ad lifecycle events go.
//!
//! The controller only knows `EventBus`. The Tauri plugin forwards to the
//! webview, the simulator prints, and tests record.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Sink for `ads:*` topics. Emission is fire-and-forget and must not block.
pub trait EventBus: Send + Sync {
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

pub type EventBusRef = Arc<dyn EventBus>;

/// One recorded emission.
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Records every emission in order.
///
/// A panic while the log is held does not lose what was recorded; later
/// readers see the log as it stood.
#[derive(Default)]
pub struct InMemoryEventBus {
    log: Mutex<Vec<EmittedEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<EmittedEvent>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<EmittedEvent> {
        self.log().clone()
    }

    /// Recorded emissions on `topic`, oldest first.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.log()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Topic sequence, for asserting emission order.
    pub fn topics(&self) -> Vec<String> {
        self.log().iter().map(|e| e.topic.clone()).collect()
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    pub fn len(&self) -> usize {
        self.log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.log().push(EmittedEvent {
            topic: topic.to_owned(),
            payload,
        });
    }
}

/// Drops everything. Used where nobody listens, e.g. headless embedding.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}
