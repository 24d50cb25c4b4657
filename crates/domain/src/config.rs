//! Deploy-time ad configuration.
//!
//! Every field has a default, so an empty `plugins.adpace` section in the
//! host config yields the stock behaviour with the network's test units.

use crate::platform::Platform;
use crate::surface::AdSurface;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Show an interstitial every Nth content open.
pub const DEFAULT_INTERSTITIAL_EVERY: u32 = 2;

/// Minimum background time before an app-open ad is shown on return.
pub const DEFAULT_FOREGROUND_THRESHOLD_MS: u64 = 30_000;

/// Bottom margin keeping the banner clear of docked navigation.
pub const DEFAULT_BANNER_MARGIN: u32 = 60;

/// Wait after an on-demand load before trusting the ad is displayable.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_000;

/// Delay before refilling a surface after a show or dismiss.
pub const DEFAULT_REFILL_DELAY_MS: u64 = 1_000;

/// Delay before retrying a surface after a load or show failure.
pub const DEFAULT_FAILURE_BACKOFF_MS: u64 = 2_000;

/// Consecutive failure retries before a surface gives up.
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 5;

/// Network unit identifiers for one surface, keyed by platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitIds {
    pub android: String,
    pub ios: String,
}

impl UnitIds {
    pub fn new(android: impl Into<String>, ios: impl Into<String>) -> Self {
        Self {
            android: android.into(),
            ios: ios.into(),
        }
    }

    pub fn for_platform(&self, platform: Platform) -> &str {
        match platform {
            Platform::Android => &self.android,
            Platform::Ios => &self.ios,
        }
    }
}

/// Ad subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdConfig {
    pub banner_units: UnitIds,
    pub interstitial_units: UnitIds,
    pub app_open_units: UnitIds,

    /// Interstitial frequency. `0` disables interstitial shows.
    pub interstitial_every: u32,
    pub foreground_threshold_ms: u64,
    pub banner_margin: u32,
    pub settle_delay_ms: u64,
    pub refill_delay_ms: u64,
    pub failure_backoff_ms: u64,

    /// Cap on consecutive failure retries per surface. `None` retries forever.
    pub max_retry_attempts: Option<u32>,

    /// Ask the SDK to serve test creatives.
    pub initialize_for_testing: bool,
    pub testing_devices: Vec<String>,
}

impl Default for AdConfig {
    fn default() -> Self {
        Self {
            banner_units: UnitIds::new(
                "ca-app-pub-3940256099942544/9214589741",
                "ca-app-pub-3940256099942544/2435281174",
            ),
            interstitial_units: UnitIds::new(
                "ca-app-pub-3940256099942544/1033173712",
                "ca-app-pub-3940256099942544/4411468910",
            ),
            app_open_units: UnitIds::new(
                "ca-app-pub-3940256099942544/9257395921",
                "ca-app-pub-3940256099942544/5575463023",
            ),
            interstitial_every: DEFAULT_INTERSTITIAL_EVERY,
            foreground_threshold_ms: DEFAULT_FOREGROUND_THRESHOLD_MS,
            banner_margin: DEFAULT_BANNER_MARGIN,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            refill_delay_ms: DEFAULT_REFILL_DELAY_MS,
            failure_backoff_ms: DEFAULT_FAILURE_BACKOFF_MS,
            max_retry_attempts: Some(DEFAULT_MAX_RETRY_ATTEMPTS),
            initialize_for_testing: false,
            testing_devices: Vec::new(),
        }
    }
}

impl AdConfig {
    pub fn units(&self, surface: AdSurface) -> &UnitIds {
        match surface {
            AdSurface::Banner => &self.banner_units,
            AdSurface::Interstitial => &self.interstitial_units,
            AdSurface::AppOpen => &self.app_open_units,
        }
    }

    pub fn unit_id(&self, surface: AdSurface, platform: Platform) -> &str {
        self.units(surface).for_platform(platform)
    }

    pub fn foreground_threshold(&self) -> Duration {
        Duration::from_millis(self.foreground_threshold_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn refill_delay(&self) -> Duration {
        Duration::from_millis(self.refill_delay_ms)
    }

    pub fn failure_backoff(&self) -> Duration {
        Duration::from_millis(self.failure_backoff_ms)
    }
}
