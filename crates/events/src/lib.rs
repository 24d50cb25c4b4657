//! Shared event contracts for the ad lifecycle.
//!
//! These DTOs are what the controller emits and what the host shell
//! listens for. Using shared types keeps the Rust emitter and the JS
//! listener agreeing on field names.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};

use adpace_domain::{AdSurface, LoadState, Platform};
use serde::{Deserialize, Serialize};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Event emitted when the ad network SDK finished initializing.
///
/// Producers: ads controller
/// Consumers: frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsInitializedEvent {
    pub platform: Platform,
    pub testing: bool,
    pub timestamp_ms: i64,
}

impl AdsInitializedEvent {
    pub fn new(platform: Platform, testing: bool) -> Self {
        Self {
            platform,
            testing,
            timestamp_ms: now_ms(),
        }
    }
}

/// Event emitted whenever a preloaded surface changes load state.
///
/// Producers: ads controller
/// Consumers: frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdStateChangedEvent {
    pub surface: AdSurface,
    pub state: LoadState,
    #[serde(default)]
    pub error: Option<String>,
    pub timestamp_ms: i64,
}

impl AdStateChangedEvent {
    pub fn new(surface: AdSurface, state: LoadState, error: Option<String>) -> Self {
        Self {
            surface,
            state,
            error,
            timestamp_ms: now_ms(),
        }
    }
}

/// Event emitted once when a surface stops retrying after repeated failures.
///
/// Producers: ads controller (retry scheduling)
/// Consumers: frontend, diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryExhaustedEvent {
    pub surface: AdSurface,
    pub attempts: u32,
    #[serde(default)]
    pub last_error: Option<String>,
    pub timestamp_ms: i64,
}

impl RetryExhaustedEvent {
    pub fn new(surface: AdSurface, attempts: u32, last_error: Option<String>) -> Self {
        Self {
            surface,
            attempts,
            last_error,
            timestamp_ms: now_ms(),
        }
    }
}

/// Event emitted for every counted content open.
///
/// Producers: ads controller (frequency gate)
/// Consumers: frontend, diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentOpenedEvent {
    pub count: u64,
    /// Whether this open triggered an interstitial show.
    pub show_triggered: bool,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    pub const ADS_INITIALIZED: &str = "ads:initialized";
    pub const AD_STATE_CHANGED: &str = "ads:state_changed";
    pub const RETRY_EXHAUSTED: &str = "ads:retry_exhausted";
    pub const CONTENT_OPENED: &str = "ads:content_opened";
}
