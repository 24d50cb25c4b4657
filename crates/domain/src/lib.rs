//! Domain types for the adpace ad lifecycle.
//!
//! Pure data and decision logic shared by the controller, the event
//! contracts and the Tauri plugin:
//! - Ad surfaces and their load-state machine
//! - Platform detection (the capability gate)
//! - Deploy-time configuration (unit ids, thresholds, delays)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer (this crate)               │
//! │  surface.rs  - AdSurface, LoadState, SurfaceState           │
//! │  platform.rs - Platform, PlatformProvider (capability gate) │
//! │  config.rs   - AdConfig, UnitIds                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer (adpace-ads)             │
//! │  controller, frequency gate, visibility watcher, retries    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod platform;
mod surface;

pub use config::{
    AdConfig, UnitIds, DEFAULT_BANNER_MARGIN, DEFAULT_FAILURE_BACKOFF_MS,
    DEFAULT_FOREGROUND_THRESHOLD_MS, DEFAULT_INTERSTITIAL_EVERY, DEFAULT_MAX_RETRY_ATTEMPTS,
    DEFAULT_REFILL_DELAY_MS, DEFAULT_SETTLE_DELAY_MS,
};
pub use platform::{
    NativePlatform, Platform, PlatformProvider, PlatformProviderRef, UnsupportedPlatform,
};
pub use surface::{AdSurface, LoadState, SurfaceState};
