//! Ad lifecycle controller.
//!
//! Owns the per-surface load state and drives the network through
//! initialize → prepare → show → refill. The frequency gate, visibility
//! watcher and retry scheduler all route through here.
//!
//! Load-state checks and the network's own load callbacks are not
//! serialized against each other: two prepares racing on an `Unloaded`
//! surface may both hit the network. Every transition is safe to repeat, so
//! the state converges; it is eventually consistent, not strict.

use crate::error::{AdError, Result};
use crate::frequency::{ContentOpenAction, FrequencyGate};
use crate::network::{
    AdNetworkRef, BannerOptions, BannerPosition, BannerSize, InitializeOptions, NetworkEvent,
    NetworkEventKind, PrepareOptions,
};
use crate::retry::{RetryReason, RetryScheduler, ScheduledTask};
use crate::visibility::VisibilityWatcher;
use adpace_domain::{AdConfig, AdSurface, LoadState, PlatformProviderRef, SurfaceState};
use adpace_events::{
    event_names, AdStateChangedEvent, AdsInitializedEvent, ContentOpenedEvent, EventBusRef,
    RetryExhaustedEvent,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;

#[derive(Default)]
struct ControllerState {
    initialized: bool,
    interstitial: SurfaceState,
    app_open: SurfaceState,
}

impl ControllerState {
    fn surface(&self, surface: AdSurface) -> Option<&SurfaceState> {
        match surface {
            AdSurface::Interstitial => Some(&self.interstitial),
            AdSurface::AppOpen => Some(&self.app_open),
            AdSurface::Banner => None,
        }
    }

    fn surface_mut(&mut self, surface: AdSurface) -> Option<&mut SurfaceState> {
        match surface {
            AdSurface::Interstitial => Some(&mut self.interstitial),
            AdSurface::AppOpen => Some(&mut self.app_open),
            AdSurface::Banner => None,
        }
    }
}

struct Inner {
    config: AdConfig,
    platform: PlatformProviderRef,
    network: AdNetworkRef,
    events: EventBusRef,
    state: Mutex<ControllerState>,
    frequency: FrequencyGate,
    visibility: VisibilityWatcher,
    scheduler: RetryScheduler,
}

/// Handle to the ad subsystem. Cheap to clone; all clones share state.
///
/// Every public operation is a successful no-op when the platform provider
/// reports the host as unsupported.
#[derive(Clone)]
pub struct AdController {
    inner: Arc<Inner>,
}

impl AdController {
    pub fn new(
        config: AdConfig,
        platform: PlatformProviderRef,
        network: AdNetworkRef,
        events: EventBusRef,
    ) -> Self {
        let frequency = FrequencyGate::new(config.interstitial_every);
        let visibility = VisibilityWatcher::new(config.foreground_threshold());

        Self {
            inner: Arc::new(Inner {
                config,
                platform,
                network,
                events,
                state: Mutex::new(ControllerState::default()),
                frequency,
                visibility,
                scheduler: RetryScheduler::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit<T: Serialize>(&self, topic: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.inner.events.emit(topic, value),
            Err(e) => tracing::debug!(topic, error = %e, "failed to serialize event"),
        }
    }

    /// Mutate one surface's state and report a change if the load state or
    /// error moved. Returns `None` for the banner, which has no state.
    fn update_surface<T>(
        &self,
        surface: AdSurface,
        f: impl FnOnce(&mut SurfaceState) -> T,
    ) -> Option<T> {
        let (result, changed) = {
            let mut state = self.lock();
            let slot = state.surface_mut(surface)?;
            let before = (slot.load_state, slot.last_error.clone());
            let result = f(slot);
            let after = (slot.load_state, slot.last_error.clone());
            (result, (before != after).then_some(after))
        };

        if let Some((load_state, error)) = changed {
            tracing::debug!(surface = %surface, state = %load_state, "surface state changed");
            self.emit(
                event_names::AD_STATE_CHANGED,
                &AdStateChangedEvent::new(surface, load_state, error),
            );
        }

        Some(result)
    }

    // Capability gate and accessors

    /// Whether the host can display ads. Asked fresh on every call.
    pub fn is_supported(&self) -> bool {
        self.inner.platform.is_supported()
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    pub fn config(&self) -> &AdConfig {
        &self.inner.config
    }

    /// Snapshot of a preloaded surface's state. `None` for the banner.
    pub fn surface_state(&self, surface: AdSurface) -> Option<SurfaceState> {
        self.lock().surface(surface).cloned()
    }

    pub fn load_state(&self, surface: AdSurface) -> Option<LoadState> {
        self.lock().surface(surface).map(|s| s.load_state)
    }

    pub fn content_open_count(&self) -> u64 {
        self.inner.frequency.count()
    }

    /// Scheduled retries and background tasks still outstanding.
    pub fn pending_tasks(&self) -> usize {
        self.inner.scheduler.pending()
    }

    // Lifecycle

    /// Initialize the network SDK, start listening for network events and
    /// preload the interstitial and app-open surfaces.
    ///
    /// Repeated calls after a successful initialize are no-ops. Preload
    /// failures are retried in the background and do not fail the call.
    pub async fn initialize(&self) -> Result<()> {
        if !self.is_supported() {
            return Ok(());
        }
        if self.is_initialized() {
            tracing::debug!("ads already initialized");
            return Ok(());
        }

        let options = InitializeOptions {
            initialize_for_testing: self.inner.config.initialize_for_testing,
            testing_devices: self.inner.config.testing_devices.clone(),
        };

        // Subscribe before the SDK starts so no early load signal is missed.
        let receiver = self.inner.network.subscribe();

        self.inner
            .network
            .initialize(&options)
            .await
            .map_err(|source| {
                tracing::error!(error = %source, "ad network initialization failed");
                AdError::InitializationFailure { source }
            })?;

        {
            let mut state = self.lock();
            if state.initialized {
                return Ok(());
            }
            state.initialized = true;
        }

        self.listen_for_network_events(receiver);

        let platform = self.inner.platform.current_platform();
        tracing::info!(platform = %platform, testing = options.initialize_for_testing, "ads initialized");
        self.emit(
            event_names::ADS_INITIALIZED,
            &AdsInitializedEvent::new(platform, options.initialize_for_testing),
        );

        let (interstitial, app_open) = tokio::join!(
            self.prepare(AdSurface::Interstitial),
            self.prepare(AdSurface::AppOpen)
        );
        for (surface, result) in [
            (AdSurface::Interstitial, interstitial),
            (AdSurface::AppOpen, app_open),
        ] {
            if let Err(e) = result {
                tracing::warn!(surface = %surface, error = %e, "initial preload failed");
                self.schedule_prepare(surface, RetryReason::Failure);
            }
        }

        Ok(())
    }

    /// Cancel every pending retry, settle delay and the event listener.
    pub fn shutdown(&self) {
        self.inner.scheduler.shutdown();
        tracing::info!("ads controller shut down");
    }

    fn listen_for_network_events(&self, mut receiver: tokio::sync::broadcast::Receiver<NetworkEvent>) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let token = self.inner.scheduler.shutdown_token();

        tokio::spawn(async move {
            tracing::debug!("network event listener started");
            loop {
                let event = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    event = receiver.recv() => event,
                };

                match event {
                    Ok(event) => {
                        let Some(inner) = weak.upgrade() else {
                            break;
                        };
                        AdController { inner }.handle_network_event(event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "network event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("network event listener stopped");
        });
    }

    fn handle_network_event(&self, event: NetworkEvent) {
        let surface = event.surface;
        if !surface.is_preloaded() {
            tracing::debug!(surface = %surface, "ignoring network event for banner");
            return;
        }

        match event.kind {
            NetworkEventKind::Loaded => {
                self.update_surface(surface, SurfaceState::mark_loaded);
            }
            NetworkEventKind::Dismissed => {
                self.update_surface(surface, SurfaceState::mark_consumed);
                self.schedule_prepare(surface, RetryReason::Dismissed);
            }
            NetworkEventKind::FailedToLoad { message } => {
                self.update_surface(surface, |s| s.mark_load_failed(message));
            }
        }
    }

    // Preloaded surfaces

    pub async fn prepare_interstitial(&self) -> Result<()> {
        self.prepare_or_retry(AdSurface::Interstitial).await
    }

    pub async fn prepare_app_open_ad(&self) -> Result<()> {
        self.prepare_or_retry(AdSurface::AppOpen).await
    }

    pub async fn show_interstitial(&self) -> Result<()> {
        self.show(AdSurface::Interstitial).await
    }

    pub async fn show_app_open_ad(&self) -> Result<()> {
        self.show(AdSurface::AppOpen).await
    }

    /// The caller still sees the failure; a backoff prepare is queued behind it.
    async fn prepare_or_retry(&self, surface: AdSurface) -> Result<()> {
        let result = self.prepare(surface).await;
        if result.is_err() {
            self.schedule_prepare(surface, RetryReason::Failure);
        }
        result
    }

    async fn prepare(&self, surface: AdSurface) -> Result<()> {
        if !self.is_supported() {
            return Ok(());
        }

        let Some(already_loaded) = self.update_surface(surface, |s| {
            if s.is_loaded() {
                true
            } else {
                s.begin_loading();
                false
            }
        }) else {
            return Ok(());
        };
        if already_loaded {
            tracing::debug!(surface = %surface, "already loaded, skipping prepare");
            return Ok(());
        }

        let platform = self.inner.platform.current_platform();
        let options = PrepareOptions {
            ad_id: self.inner.config.unit_id(surface, platform).to_string(),
            is_testing: self.inner.config.initialize_for_testing,
        };

        match self.inner.network.prepare(surface, &options).await {
            Ok(()) => {
                self.update_surface(surface, SurfaceState::mark_loaded);
                Ok(())
            }
            Err(source) => {
                let message = source.message.clone();
                self.update_surface(surface, |s| s.mark_load_failed(message));
                Err(AdError::LoadFailure { surface, source })
            }
        }
    }

    async fn show(&self, surface: AdSurface) -> Result<()> {
        if !self.is_supported() || !surface.is_preloaded() {
            return Ok(());
        }

        if self.load_state(surface) != Some(LoadState::Loaded) {
            if let Err(e) = self.prepare(surface).await {
                self.schedule_prepare(surface, RetryReason::Failure);
                return Err(e);
            }
            if !self.inner.scheduler.sleep(self.inner.config.settle_delay()).await {
                tracing::debug!(surface = %surface, "shut down during settle delay");
                return Ok(());
            }
        }

        self.update_surface(surface, SurfaceState::begin_showing);
        let result = self.inner.network.show(surface).await;
        self.update_surface(surface, |s| {
            s.mark_consumed();
            if let Err(e) = &result {
                s.last_error = Some(e.message.clone());
            }
        });

        match result {
            Ok(()) => {
                tracing::debug!(surface = %surface, "ad shown");
                self.schedule_prepare(surface, RetryReason::Refill);
                Ok(())
            }
            Err(source) => {
                self.schedule_prepare(surface, RetryReason::Failure);
                Err(AdError::ShowFailure { surface, source })
            }
        }
    }

    /// Schedule a delayed prepare. Failure retries count against the retry
    /// cap; once it is hit the surface gives up and this reports it once.
    fn schedule_prepare(&self, surface: AdSurface, reason: RetryReason) -> Option<ScheduledTask> {
        if reason.counts_as_failure() {
            let max_attempts = self.inner.config.max_retry_attempts;
            let (allowed, newly_exhausted, attempts, last_error) =
                self.update_surface(surface, |s| {
                    let was_exhausted = s.gave_up;
                    let allowed = s.register_failure_retry(max_attempts);
                    (
                        allowed,
                        !allowed && !was_exhausted,
                        s.consecutive_failures,
                        s.last_error.clone(),
                    )
                })?;

            if newly_exhausted {
                tracing::warn!(surface = %surface, attempts, "giving up on surface after repeated failures");
                self.emit(
                    event_names::RETRY_EXHAUSTED,
                    &RetryExhaustedEvent::new(surface, attempts, last_error),
                );
            }
            if !allowed {
                return None;
            }
        }

        let delay = reason.delay(&self.inner.config);
        tracing::debug!(
            surface = %surface,
            reason = %reason,
            delay_ms = delay.as_millis() as u64,
            "scheduling prepare"
        );

        let controller = self.clone();
        Some(self.inner.scheduler.schedule(delay, async move {
            if let Err(e) = controller.prepare(surface).await {
                tracing::warn!(surface = %surface, error = %e, "scheduled prepare failed");
                controller.schedule_prepare(surface, RetryReason::Failure);
            }
        }))
    }

    // Banner

    /// Show the adaptive banner docked at the bottom. Not retried.
    pub async fn show_banner(&self) -> Result<()> {
        if !self.is_supported() {
            return Ok(());
        }

        let platform = self.inner.platform.current_platform();
        let options = BannerOptions {
            ad_id: self
                .inner
                .config
                .unit_id(AdSurface::Banner, platform)
                .to_string(),
            ad_size: BannerSize::AdaptiveBanner,
            position: BannerPosition::BottomCenter,
            margin: self.inner.config.banner_margin,
            is_testing: self.inner.config.initialize_for_testing,
        };

        self.inner
            .network
            .show_banner(&options)
            .await
            .map_err(|source| {
                tracing::warn!(error = %source, "banner show failed");
                AdError::ShowFailure {
                    surface: AdSurface::Banner,
                    source,
                }
            })
    }

    pub async fn remove_banner(&self) -> Result<()> {
        if !self.is_supported() {
            return Ok(());
        }

        self.inner.network.remove_banner().await.map_err(|source| {
            tracing::warn!(error = %source, "banner removal failed");
            AdError::RemoveFailure {
                surface: AdSurface::Banner,
                source,
            }
        })
    }

    // Frequency gate

    /// Count a content open. Every Nth open shows the interstitial; other
    /// opens top up the interstitial cache if it is empty.
    ///
    /// Never fails: ad work runs in the background and its failures turn
    /// into scheduled retries.
    pub async fn track_content_open(&self) -> ContentOpenAction {
        if !self.is_supported() {
            return ContentOpenAction::Skipped;
        }

        let (count, show_turn) = self.inner.frequency.record();
        let surface = AdSurface::Interstitial;

        let action = if show_turn {
            let controller = self.clone();
            self.inner.scheduler.spawn(async move {
                // A failed show already scheduled its own retry.
                if let Err(e) = controller.show(surface).await {
                    tracing::warn!(count, error = %e, "interstitial show failed");
                }
            });
            ContentOpenAction::Show
        } else if self.load_state(surface) != Some(LoadState::Loaded) {
            let controller = self.clone();
            self.inner.scheduler.spawn(async move {
                if let Err(e) = controller.prepare(surface).await {
                    tracing::warn!(count, error = %e, "interstitial top-up failed");
                    controller.schedule_prepare(surface, RetryReason::Failure);
                }
            });
            ContentOpenAction::Prepare
        } else {
            ContentOpenAction::Skipped
        };

        tracing::debug!(count, ?action, "content opened");
        self.emit(
            event_names::CONTENT_OPENED,
            &ContentOpenedEvent {
                count,
                show_triggered: action == ContentOpenAction::Show,
            },
        );

        action
    }

    // Visibility watcher

    /// Full-screen ads take focus from the host window, so focus loss while
    /// one is on screen is not treated as leaving the app.
    pub async fn app_backgrounded(&self) {
        if !self.is_supported() {
            return;
        }
        let showing = [AdSurface::Interstitial, AdSurface::AppOpen]
            .into_iter()
            .find(|s| self.load_state(*s) == Some(LoadState::Showing));
        if let Some(surface) = showing {
            tracing::debug!(surface = %surface, "focus lost to full-screen ad, not backgrounded");
            return;
        }
        self.inner.visibility.mark_backgrounded(Instant::now());
        tracing::debug!("app backgrounded");
    }

    /// Returns whether an app-open ad show was started.
    pub async fn app_foregrounded(&self) -> bool {
        if !self.is_supported() {
            return false;
        }

        let away_long_enough = self.inner.visibility.check_foregrounded(Instant::now());
        if !away_long_enough || !self.is_initialized() {
            tracing::debug!(away_long_enough, "app foregrounded, no app-open ad");
            return false;
        }

        let controller = self.clone();
        self.inner.scheduler.spawn(async move {
            if let Err(e) = controller.show(AdSurface::AppOpen).await {
                tracing::warn!(error = %e, "app-open show failed");
            }
        });
        true
    }
}
