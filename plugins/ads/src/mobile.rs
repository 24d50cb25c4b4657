//! Bridge to the native ad network plugin on Android and iOS.
//!
//! Calls go through `run_mobile_plugin`, which blocks, so each one runs on
//! the blocking pool. Loaded/dismissed signals come back through the
//! `notify_network_event` command and are fanned out on `events`.

use adpace_ads::{
    AdNetwork, AdSurface, BannerOptions, InitializeOptions, NetworkError, NetworkEvent,
    PrepareOptions,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tauri::plugin::{PluginApi, PluginHandle};
use tauri::Runtime;
use tokio::sync::broadcast;

#[cfg(target_os = "android")]
const PLUGIN_IDENTIFIER: &str = "app.adpace.plugin";

#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_adpace);

pub fn register<R: Runtime, C: DeserializeOwned>(
    api: PluginApi<R, C>,
    events: broadcast::Sender<NetworkEvent>,
) -> Result<MobileAdNetwork<R>, Box<dyn std::error::Error>> {
    #[cfg(target_os = "android")]
    let handle = api.register_android_plugin(PLUGIN_IDENTIFIER, "AdMobPlugin")?;
    #[cfg(target_os = "ios")]
    let handle = api.register_ios_plugin(init_plugin_adpace)?;

    Ok(MobileAdNetwork { handle, events })
}

pub struct MobileAdNetwork<R: Runtime> {
    handle: PluginHandle<R>,
    events: broadcast::Sender<NetworkEvent>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SurfacePayload<'a, T: Serialize> {
    surface: AdSurface,
    #[serde(flatten)]
    options: &'a T,
}

#[derive(Serialize)]
struct NoPayload {}

impl<R: Runtime> MobileAdNetwork<R> {
    async fn call<P>(&self, command: &'static str, payload: P) -> Result<(), NetworkError>
    where
        P: Serialize + Send + 'static,
    {
        let handle = self.handle.clone();
        tauri::async_runtime::spawn_blocking(move || {
            handle.run_mobile_plugin::<serde_json::Value>(command, payload)
        })
        .await
        .map_err(|e| NetworkError::new(format!("{command} did not complete: {e}")))?
        .map(|_| ())
        .map_err(|e| NetworkError::new(e.to_string()))
    }
}

#[async_trait]
impl<R: Runtime> AdNetwork for MobileAdNetwork<R> {
    async fn initialize(&self, options: &InitializeOptions) -> Result<(), NetworkError> {
        self.call("initialize", options.clone()).await
    }

    async fn show_banner(&self, options: &BannerOptions) -> Result<(), NetworkError> {
        self.call("showBanner", options.clone()).await
    }

    async fn remove_banner(&self) -> Result<(), NetworkError> {
        self.call("removeBanner", NoPayload {}).await
    }

    async fn prepare(
        &self,
        surface: AdSurface,
        options: &PrepareOptions,
    ) -> Result<(), NetworkError> {
        let payload = serde_json::to_value(SurfacePayload { surface, options })
            .map_err(|e| NetworkError::new(e.to_string()))?;
        self.call("prepare", payload).await
    }

    async fn show(&self, surface: AdSurface) -> Result<(), NetworkError> {
        let payload = serde_json::json!({ "surface": surface });
        self.call("show", payload).await
    }

    fn subscribe(&self) -> broadcast::Receiver<NetworkEvent> {
        self.events.subscribe()
    }
}
