//! Platform detection for the capability gate.
//!
//! Ads are only served inside a native mobile runtime. Browser and desktop
//! hosts report themselves as unsupported and every ad operation becomes
//! a no-op.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Mobile platform the ad network keys its unit ids by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Provider for host runtime capabilities.
///
/// Queried on every ad operation; implementations must be cheap.
pub trait PlatformProvider: Send + Sync {
    /// Whether the host is a native mobile runtime.
    fn is_native_platform(&self) -> bool;

    /// The platform to pick unit ids for. Only meaningful when native.
    fn current_platform(&self) -> Platform;

    /// Capability gate: can ads be displayed at all?
    fn is_supported(&self) -> bool {
        self.is_native_platform()
    }
}

/// Type alias for a shared platform provider.
pub type PlatformProviderRef = Arc<dyn PlatformProvider>;

/// Browser or desktop host. Nothing is ever shown.
pub struct UnsupportedPlatform;

impl PlatformProvider for UnsupportedPlatform {
    fn is_native_platform(&self) -> bool {
        false
    }

    fn current_platform(&self) -> Platform {
        Platform::Android
    }
}

/// Native host with a fixed platform.
#[derive(Debug, Clone, Copy)]
pub struct NativePlatform(pub Platform);

impl PlatformProvider for NativePlatform {
    fn is_native_platform(&self) -> bool {
        true
    }

    fn current_platform(&self) -> Platform {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_gate() {
        assert!(!UnsupportedPlatform.is_supported());
    }

    #[test]
    fn test_native_platform_gate() {
        let provider = NativePlatform(Platform::Ios);
        assert!(provider.is_supported());
        assert_eq!(provider.current_platform(), Platform::Ios);
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Platform::Ios).unwrap(), "\"ios\"");
        assert_eq!(Platform::Android.to_string(), "android");
    }
}
