//! Ad lifecycle and scheduling for adpace.
//!
//! Preloads, shows and refills interstitial and app-open ads, shows the
//! bottom banner, and decides when ads appear:
//! - **Frequency gate**: an interstitial every Nth content open
//! - **Visibility watcher**: an app-open ad after a long background stay
//! - **Retry scheduler**: delayed, bounded, cancellable refills and retries
//!
//! On hosts without a native ad runtime every operation is a no-op.
//!
//! # Example
//!
//! ```ignore
//! use adpace_ads::{AdController, NullAdNetwork};
//! use adpace_domain::{AdConfig, NativePlatform, Platform};
//! use adpace_events::NullEventBus;
//! use std::sync::Arc;
//!
//! let ads = AdController::new(
//!     AdConfig::default(),
//!     Arc::new(NativePlatform(Platform::Android)),
//!     Arc::new(my_network),
//!     Arc::new(NullEventBus),
//! );
//!
//! ads.initialize().await?;
//! ads.track_content_open().await;
//! ```

mod controller;
mod error;
mod frequency;
mod network;
mod retry;
mod visibility;

pub use controller::AdController;
pub use error::{AdError, NetworkError, Result};
pub use frequency::{ContentOpenAction, FrequencyGate};
pub use network::{
    AdNetwork, AdNetworkRef, BannerOptions, BannerPosition, BannerSize, InitializeOptions,
    NetworkEvent, NetworkEventKind, NullAdNetwork, PrepareOptions, NETWORK_EVENT_CAPACITY,
};
pub use retry::{RetryReason, RetryScheduler, ScheduledTask};
pub use visibility::VisibilityWatcher;

// Re-export domain types the controller API is expressed in
pub use adpace_domain::{
    AdConfig, AdSurface, LoadState, NativePlatform, Platform, PlatformProvider,
    PlatformProviderRef, SurfaceState, UnitIds, UnsupportedPlatform,
};
