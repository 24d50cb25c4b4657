//! Ad surfaces and their load-state machine.
//!
//! Pure domain logic - no I/O, no timers.

use serde::{Deserialize, Serialize};

/// An ad placement kind served by the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdSurface {
    /// Small persistent ad docked at the bottom. Never preloaded.
    Banner,
    /// Full-screen ad shown between content views.
    Interstitial,
    /// Full-screen ad shown on return to foreground.
    AppOpen,
}

impl AdSurface {
    /// Surfaces that go through the prepare/show cycle.
    pub const PRELOADED: [AdSurface; 2] = [AdSurface::Interstitial, AdSurface::AppOpen];

    pub fn label(&self) -> &'static str {
        match self {
            AdSurface::Banner => "banner",
            AdSurface::Interstitial => "interstitial",
            AdSurface::AppOpen => "app_open",
        }
    }

    /// Whether this surface is cached ahead of display.
    pub fn is_preloaded(&self) -> bool {
        !matches!(self, AdSurface::Banner)
    }
}

impl std::fmt::Display for AdSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Load state of a preloaded surface.
///
/// ```text
/// Unloaded --prepare ok--> Loaded --show--> Showing --always--> Unloaded
///     ^          |
///     +--fail----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    Showing,
}

impl LoadState {
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Unloaded => "unloaded",
            LoadState::Loading => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Showing => "showing",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Bookkeeping for one preloaded surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceState {
    pub load_state: LoadState,

    /// Message of the most recent load or show failure.
    #[serde(default)]
    pub last_error: Option<String>,

    /// Failure retries scheduled since the last successful load.
    #[serde(default)]
    pub consecutive_failures: u32,

    /// Set once the retry cap is reached; cleared by the next successful load.
    #[serde(default)]
    pub gave_up: bool,
}

impl SurfaceState {
    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    pub fn begin_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// A load succeeded, either from our own prepare or a network callback.
    pub fn mark_loaded(&mut self) {
        self.load_state = LoadState::Loaded;
        self.last_error = None;
        self.consecutive_failures = 0;
        self.gave_up = false;
    }

    pub fn mark_load_failed(&mut self, error: impl Into<String>) {
        self.load_state = LoadState::Unloaded;
        self.last_error = Some(error.into());
    }

    pub fn begin_showing(&mut self) {
        self.load_state = LoadState::Showing;
    }

    /// The cached ad was consumed (shown, dismissed, or failed to show).
    pub fn mark_consumed(&mut self) {
        self.load_state = LoadState::Unloaded;
    }

    /// Count one more failure retry against `max_attempts`.
    ///
    /// Returns `false` when the cap has been reached; the surface is then
    /// marked as given up. `None` means retries are unbounded.
    pub fn register_failure_retry(&mut self, max_attempts: Option<u32>) -> bool {
        if let Some(max) = max_attempts {
            if self.consecutive_failures >= max {
                self.gave_up = true;
                return false;
            }
        }
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        true
    }
}
