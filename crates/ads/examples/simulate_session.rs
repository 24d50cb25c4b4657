//! Example: drive the ad controller through a simulated browsing session.
//!
//! Run with: cargo run -p adpace-ads --example simulate_session

use adpace_ads::{
    AdConfig, AdController, AdNetwork, AdSurface, BannerOptions, InitializeOptions,
    NativePlatform, NetworkError, NetworkEvent, Platform, PrepareOptions, NETWORK_EVENT_CAPACITY,
};
use adpace_events::{EventBus, EventBusRef};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Network that takes 200ms per load and fails every third one.
struct SimulatedNetwork {
    events: broadcast::Sender<NetworkEvent>,
    loads: AtomicU32,
}

#[async_trait]
impl AdNetwork for SimulatedNetwork {
    async fn initialize(&self, _options: &InitializeOptions) -> Result<(), NetworkError> {
        Ok(())
    }

    async fn show_banner(&self, options: &BannerOptions) -> Result<(), NetworkError> {
        println!("  [network] banner {} at margin {}", options.ad_id, options.margin);
        Ok(())
    }

    async fn remove_banner(&self) -> Result<(), NetworkError> {
        Ok(())
    }

    async fn prepare(
        &self,
        surface: AdSurface,
        options: &PrepareOptions,
    ) -> Result<(), NetworkError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        if n % 3 == 0 {
            println!("  [network] {surface} load #{n} failed (no fill)");
            return Err(NetworkError::with_code("no fill", 3));
        }
        println!("  [network] {surface} loaded from {}", options.ad_id);
        Ok(())
    }

    async fn show(&self, surface: AdSurface) -> Result<(), NetworkError> {
        println!("  [network] showing {surface}");
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let _ = events.send(NetworkEvent::dismissed(surface));
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<NetworkEvent> {
        self.events.subscribe()
    }
}

struct PrintingBus;

impl EventBus for PrintingBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        println!("  [event] {topic} {payload}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("adpace_ads=debug")
        .init();

    println!("=== Simulated Ad Session ===\n");

    let (events, _) = broadcast::channel(NETWORK_EVENT_CAPACITY);
    let network = Arc::new(SimulatedNetwork {
        events,
        loads: AtomicU32::new(0),
    });
    let bus: EventBusRef = Arc::new(PrintingBus);

    let config = AdConfig {
        foreground_threshold_ms: 2_000,
        initialize_for_testing: true,
        ..Default::default()
    };
    let ads = AdController::new(
        config,
        Arc::new(NativePlatform(Platform::Android)),
        network,
        bus,
    );

    ads.initialize().await?;
    ads.show_banner().await?;

    for i in 1..=5 {
        println!("\nOpening content #{i}");
        let action = ads.track_content_open().await;
        println!("  -> {action:?}");
        tokio::time::sleep(Duration::from_millis(1_500)).await;
    }

    println!("\nBackgrounding for 3 seconds...");
    ads.app_backgrounded().await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    let shown = ads.app_foregrounded().await;
    println!("  -> app-open triggered: {shown}");

    tokio::time::sleep(Duration::from_secs(3)).await;
    ads.shutdown();
    println!("\nDone.");
    Ok(())
}
