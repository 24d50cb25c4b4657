//! Scripted ad network and helpers shared by the integration tests.

#![allow(dead_code)]

use adpace_ads::{
    AdConfig, AdController, AdNetwork, AdSurface, BannerOptions, InitializeOptions,
    NativePlatform, NetworkError, NetworkEvent, Platform, PlatformProvider, PrepareOptions,
    UnsupportedPlatform, NETWORK_EVENT_CAPACITY,
};
use adpace_events::InMemoryEventBus;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

/// A call the controller made into the network.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Initialize(InitializeOptions),
    ShowBanner(BannerOptions),
    RemoveBanner,
    Prepare(AdSurface, String),
    Show(AdSurface),
}

type Script = Mutex<HashMap<AdSurface, VecDeque<NetworkError>>>;

/// Network fake: every call succeeds unless a failure was queued for it.
pub struct FakeAdNetwork {
    events: broadcast::Sender<NetworkEvent>,
    calls: Mutex<Vec<Call>>,
    initialize_failures: Mutex<VecDeque<NetworkError>>,
    banner_failures: Mutex<VecDeque<NetworkError>>,
    prepare_failures: Script,
    show_failures: Script,
    prepare_delay: Mutex<Option<Duration>>,
    show_delay: Mutex<Option<Duration>>,
}

impl FakeAdNetwork {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(NETWORK_EVENT_CAPACITY);
        Arc::new(Self {
            events,
            calls: Mutex::new(Vec::new()),
            initialize_failures: Mutex::new(VecDeque::new()),
            banner_failures: Mutex::new(VecDeque::new()),
            prepare_failures: Mutex::new(HashMap::new()),
            show_failures: Mutex::new(HashMap::new()),
            prepare_delay: Mutex::new(None),
            show_delay: Mutex::new(None),
        })
    }

    pub fn fail_next_initialize(&self, message: &str) {
        self.initialize_failures
            .lock()
            .unwrap()
            .push_back(NetworkError::new(message));
    }

    pub fn fail_next_banner(&self, message: &str) {
        self.banner_failures
            .lock()
            .unwrap()
            .push_back(NetworkError::new(message));
    }

    pub fn fail_prepares(&self, surface: AdSurface, times: usize) {
        let mut script = self.prepare_failures.lock().unwrap();
        let queue = script.entry(surface).or_default();
        for _ in 0..times {
            queue.push_back(NetworkError::with_code("no fill", 3));
        }
    }

    pub fn fail_next_show(&self, surface: AdSurface, message: &str) {
        self.show_failures
            .lock()
            .unwrap()
            .entry(surface)
            .or_default()
            .push_back(NetworkError::new(message));
    }

    /// Make every prepare take this long before answering.
    pub fn set_prepare_delay(&self, delay: Duration) {
        *self.prepare_delay.lock().unwrap() = Some(delay);
    }

    /// Keep every full-screen ad on screen this long.
    pub fn set_show_delay(&self, delay: Duration) {
        *self.show_delay.lock().unwrap() = Some(delay);
    }

    /// Raise a network-side signal, as the SDK would.
    pub fn emit(&self, event: NetworkEvent) {
        let _ = self.events.send(event);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn initialize_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Initialize(_)))
    }

    pub fn prepare_count(&self, surface: AdSurface) -> usize {
        self.count(|c| matches!(c, Call::Prepare(s, _) if *s == surface))
    }

    pub fn show_count(&self, surface: AdSurface) -> usize {
        self.count(|c| matches!(c, Call::Show(s) if *s == surface))
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_failure(script: &Script, surface: AdSurface) -> Option<NetworkError> {
        script
            .lock()
            .unwrap()
            .get_mut(&surface)
            .and_then(|queue| queue.pop_front())
    }
}

#[async_trait]
impl AdNetwork for FakeAdNetwork {
    async fn initialize(&self, options: &InitializeOptions) -> Result<(), NetworkError> {
        self.record(Call::Initialize(options.clone()));
        match self.initialize_failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn show_banner(&self, options: &BannerOptions) -> Result<(), NetworkError> {
        self.record(Call::ShowBanner(options.clone()));
        match self.banner_failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn remove_banner(&self) -> Result<(), NetworkError> {
        self.record(Call::RemoveBanner);
        match self.banner_failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn prepare(
        &self,
        surface: AdSurface,
        options: &PrepareOptions,
    ) -> Result<(), NetworkError> {
        self.record(Call::Prepare(surface, options.ad_id.clone()));
        let delay = *self.prepare_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match Self::next_failure(&self.prepare_failures, surface) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn show(&self, surface: AdSurface) -> Result<(), NetworkError> {
        self.record(Call::Show(surface));
        let delay = *self.show_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match Self::next_failure(&self.show_failures, surface) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<NetworkEvent> {
        self.events.subscribe()
    }
}

pub fn android_controller_with(
    config: AdConfig,
    network: &Arc<FakeAdNetwork>,
) -> (AdController, Arc<InMemoryEventBus>) {
    let bus = Arc::new(InMemoryEventBus::new());
    let controller = AdController::new(
        config,
        Arc::new(NativePlatform(Platform::Android)),
        network.clone(),
        bus.clone(),
    );
    (controller, bus)
}

pub fn android_controller(network: &Arc<FakeAdNetwork>) -> (AdController, Arc<InMemoryEventBus>) {
    android_controller_with(AdConfig::default(), network)
}

pub fn browser_controller(network: &Arc<FakeAdNetwork>) -> AdController {
    AdController::new(
        AdConfig::default(),
        Arc::new(UnsupportedPlatform),
        network.clone(),
        Arc::new(InMemoryEventBus::new()),
    )
}

/// Android platform whose native bridge can come and go between calls.
pub struct SwitchablePlatform {
    native: AtomicBool,
}

impl SwitchablePlatform {
    pub fn new(native: bool) -> Arc<Self> {
        Arc::new(Self {
            native: AtomicBool::new(native),
        })
    }

    pub fn set_native(&self, native: bool) {
        self.native.store(native, Ordering::SeqCst);
    }
}

impl PlatformProvider for SwitchablePlatform {
    fn is_native_platform(&self) -> bool {
        self.native.load(Ordering::SeqCst)
    }

    fn current_platform(&self) -> Platform {
        Platform::Android
    }
}

pub fn switchable_controller(
    platform: &Arc<SwitchablePlatform>,
    network: &Arc<FakeAdNetwork>,
) -> AdController {
    AdController::new(
        AdConfig::default(),
        platform.clone(),
        network.clone(),
        Arc::new(InMemoryEventBus::new()),
    )
}

/// Let spawned background work run without moving the clock.
pub async fn run_background() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Move the paused clock forward and let whatever became due run.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    run_background().await;
}
