//! Ad network plugin abstraction.
//!
//! The controller never talks to an SDK directly. Hosts provide an
//! `AdNetwork` (the Tauri plugin bridges to the native mobile plugin) and
//! tests provide a scripted fake.

use crate::error::NetworkError;
use adpace_domain::AdSurface;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the network event channel.
pub const NETWORK_EVENT_CAPACITY: usize = 32;

/// Options for the one-time SDK initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeOptions {
    pub initialize_for_testing: bool,
    pub testing_devices: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BannerSize {
    AdaptiveBanner,
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BannerPosition {
    BottomCenter,
    TopCenter,
}

/// Banner display request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerOptions {
    pub ad_id: String,
    pub ad_size: BannerSize,
    pub position: BannerPosition,
    pub margin: u32,
    pub is_testing: bool,
}

/// Preload request for a full-screen surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareOptions {
    pub ad_id: String,
    pub is_testing: bool,
}

/// Signal raised by the network outside of a controller call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NetworkEventKind {
    Loaded,
    Dismissed,
    FailedToLoad { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEvent {
    pub surface: AdSurface,
    #[serde(flatten)]
    pub kind: NetworkEventKind,
}

impl NetworkEvent {
    pub fn loaded(surface: AdSurface) -> Self {
        Self {
            surface,
            kind: NetworkEventKind::Loaded,
        }
    }

    pub fn dismissed(surface: AdSurface) -> Self {
        Self {
            surface,
            kind: NetworkEventKind::Dismissed,
        }
    }

    pub fn failed_to_load(surface: AdSurface, message: impl Into<String>) -> Self {
        Self {
            surface,
            kind: NetworkEventKind::FailedToLoad {
                message: message.into(),
            },
        }
    }
}

/// The third-party ad network plugin.
///
/// `prepare` and `show` are only called with preloaded surfaces.
#[async_trait]
pub trait AdNetwork: Send + Sync {
    async fn initialize(&self, options: &InitializeOptions) -> Result<(), NetworkError>;

    async fn show_banner(&self, options: &BannerOptions) -> Result<(), NetworkError>;

    async fn remove_banner(&self) -> Result<(), NetworkError>;

    /// Load an ad into the surface's cache.
    async fn prepare(
        &self,
        surface: AdSurface,
        options: &PrepareOptions,
    ) -> Result<(), NetworkError>;

    /// Display the cached ad. Resolves once the network accepted the request.
    async fn show(&self, surface: AdSurface) -> Result<(), NetworkError>;

    /// Subscribe to loaded/dismissed signals.
    fn subscribe(&self) -> broadcast::Receiver<NetworkEvent>;
}

/// Type alias for a shared ad network.
pub type AdNetworkRef = Arc<dyn AdNetwork>;

/// Network for hosts without an ad SDK. Every call fails.
pub struct NullAdNetwork {
    events: broadcast::Sender<NetworkEvent>,
}

impl Default for NullAdNetwork {
    fn default() -> Self {
        let (events, _) = broadcast::channel(1);
        Self { events }
    }
}

impl NullAdNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    fn unavailable() -> NetworkError {
        NetworkError::new("ad network not available on this host")
    }
}

#[async_trait]
impl AdNetwork for NullAdNetwork {
    async fn initialize(&self, _options: &InitializeOptions) -> Result<(), NetworkError> {
        Err(Self::unavailable())
    }

    async fn show_banner(&self, _options: &BannerOptions) -> Result<(), NetworkError> {
        Err(Self::unavailable())
    }

    async fn remove_banner(&self) -> Result<(), NetworkError> {
        Err(Self::unavailable())
    }

    async fn prepare(
        &self,
        _surface: AdSurface,
        _options: &PrepareOptions,
    ) -> Result<(), NetworkError> {
        Err(Self::unavailable())
    }

    async fn show(&self, _surface: AdSurface) -> Result<(), NetworkError> {
        Err(Self::unavailable())
    }

    fn subscribe(&self) -> broadcast::Receiver<NetworkEvent> {
        self.events.subscribe()
    }
}
