//! Capability gate backed by the Tauri build target.

use adpace_domain::{Platform, PlatformProvider};

/// Native on Android/iOS builds, unsupported on desktop.
pub struct TauriPlatform;

impl PlatformProvider for TauriPlatform {
    fn is_native_platform(&self) -> bool {
        cfg!(mobile)
    }

    fn current_platform(&self) -> Platform {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Android
        }
    }
}
