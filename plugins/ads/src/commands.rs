use crate::error::Result;
use crate::AdsState;
use adpace_ads::{AdSurface, ContentOpenAction, NetworkEvent, SurfaceState};
use tauri::State;

#[tauri::command]
pub async fn initialize(state: State<'_, AdsState>) -> Result<()> {
    state.controller.initialize().await?;
    Ok(())
}

#[tauri::command]
pub async fn show_banner(state: State<'_, AdsState>) -> Result<()> {
    state.controller.show_banner().await?;
    Ok(())
}

#[tauri::command]
pub async fn remove_banner(state: State<'_, AdsState>) -> Result<()> {
    state.controller.remove_banner().await?;
    Ok(())
}

#[tauri::command]
pub async fn prepare_interstitial(state: State<'_, AdsState>) -> Result<()> {
    state.controller.prepare_interstitial().await?;
    Ok(())
}

#[tauri::command]
pub async fn show_interstitial(state: State<'_, AdsState>) -> Result<()> {
    state.controller.show_interstitial().await?;
    Ok(())
}

#[tauri::command]
pub async fn prepare_app_open_ad(state: State<'_, AdsState>) -> Result<()> {
    state.controller.prepare_app_open_ad().await?;
    Ok(())
}

#[tauri::command]
pub async fn show_app_open_ad(state: State<'_, AdsState>) -> Result<()> {
    state.controller.show_app_open_ad().await?;
    Ok(())
}

/// Called by the shell on every navigation into a content detail view.
#[tauri::command]
pub async fn track_content_open(state: State<'_, AdsState>) -> Result<ContentOpenAction> {
    Ok(state.controller.track_content_open().await)
}

#[tauri::command]
pub async fn app_backgrounded(state: State<'_, AdsState>) -> Result<()> {
    state.controller.app_backgrounded().await;
    Ok(())
}

#[tauri::command]
pub async fn app_foregrounded(state: State<'_, AdsState>) -> Result<bool> {
    Ok(state.controller.app_foregrounded().await)
}

/// Entry point for loaded/dismissed/failed signals from the native plugin.
#[tauri::command]
pub async fn notify_network_event(state: State<'_, AdsState>, event: NetworkEvent) -> Result<()> {
    tracing::debug!(surface = %event.surface, kind = ?event.kind, "network event");
    if state.network_events.send(event).is_err() {
        tracing::debug!("no listener for network events, ads not initialized");
    }
    Ok(())
}

#[tauri::command]
pub async fn get_surface_state(
    state: State<'_, AdsState>,
    surface: AdSurface,
) -> Result<Option<SurfaceState>> {
    Ok(state.controller.surface_state(surface))
}
