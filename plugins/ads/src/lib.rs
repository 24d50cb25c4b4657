//! Tauri plugin for the adpace ad lifecycle.
//!
//! Registers the native ad network on Android/iOS, exposes the controller
//! as commands, and feeds window focus changes to the visibility watcher.
//! On desktop the capability gate is closed and every command is a no-op.

use adpace_ads::{AdConfig, AdController, AdNetworkRef, NetworkEvent, NETWORK_EVENT_CAPACITY};
use std::sync::Arc;
use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, RunEvent, Runtime, WindowEvent,
};
use tokio::sync::broadcast;

mod commands;
mod error;
mod event_bus;
#[cfg(mobile)]
mod mobile;
mod platform;

pub use error::{PluginError, Result};
pub use event_bus::TauriEventBus;
pub use platform::TauriPlatform;

const PLUGIN_NAME: &str = "adpace";

/// Managed state: the controller plus the inlet for native network events.
pub struct AdsState {
    pub(crate) controller: AdController,
    pub(crate) network_events: broadcast::Sender<NetworkEvent>,
}

impl AdsState {
    pub fn controller(&self) -> &AdController {
        &self.controller
    }
}

/// Plugin config lives under `plugins.adpace`; every field is optional.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<AdConfig>> {
    Builder::<R, Option<AdConfig>>::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::initialize,
            commands::show_banner,
            commands::remove_banner,
            commands::prepare_interstitial,
            commands::show_interstitial,
            commands::prepare_app_open_ad,
            commands::show_app_open_ad,
            commands::track_content_open,
            commands::app_backgrounded,
            commands::app_foregrounded,
            commands::notify_network_event,
            commands::get_surface_state,
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            let (network_events, _) = broadcast::channel(NETWORK_EVENT_CAPACITY);

            #[cfg(mobile)]
            let network: AdNetworkRef = Arc::new(mobile::register(api, network_events.clone())?);
            #[cfg(desktop)]
            let network: AdNetworkRef = {
                let _ = api;
                Arc::new(adpace_ads::NullAdNetwork::new())
            };

            let controller = AdController::new(
                config,
                Arc::new(TauriPlatform),
                network,
                Arc::new(TauriEventBus::new(app.clone())),
            );
            tracing::info!(supported = controller.is_supported(), "ads plugin ready");

            app.manage(AdsState {
                controller,
                network_events,
            });
            Ok(())
        })
        .on_window_event(|window, event| {
            let WindowEvent::Focused(focused) = event else {
                return;
            };
            let Some(state) = window.try_state::<AdsState>() else {
                return;
            };
            let focused = *focused;
            let controller = state.controller.clone();
            tauri::async_runtime::spawn(async move {
                if focused {
                    controller.app_foregrounded().await;
                } else {
                    controller.app_backgrounded().await;
                }
            });
        })
        .on_event(|app, event| {
            if let RunEvent::Exit = event {
                if let Some(state) = app.try_state::<AdsState>() {
                    state.controller.shutdown();
                }
            }
        })
        .build()
}
