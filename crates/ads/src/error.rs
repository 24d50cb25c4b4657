//! Error types for the ad lifecycle.

use adpace_domain::AdSurface;
use thiserror::Error;

/// Error reported by the underlying ad network plugin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NetworkError {
    pub message: String,
    /// Network-specific error code (e.g. no-fill, network error).
    pub code: Option<i32>,
}

impl NetworkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

/// Errors surfaced by ad lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum AdError {
    /// The network SDK refused to initialize.
    #[error("ad network initialization failed: {source}")]
    InitializationFailure { source: NetworkError },

    /// A surface could not be preloaded.
    #[error("failed to load {surface} ad: {source}")]
    LoadFailure {
        surface: AdSurface,
        source: NetworkError,
    },

    /// The network rejected a display request.
    #[error("failed to show {surface} ad: {source}")]
    ShowFailure {
        surface: AdSurface,
        source: NetworkError,
    },

    /// The banner could not be taken down.
    #[error("failed to remove {surface} ad: {source}")]
    RemoveFailure {
        surface: AdSurface,
        source: NetworkError,
    },
}

impl AdError {
    /// Surface the error originated from, if any.
    pub fn surface(&self) -> Option<AdSurface> {
        match self {
            AdError::InitializationFailure { .. } => None,
            AdError::LoadFailure { surface, .. }
            | AdError::ShowFailure { surface, .. }
            | AdError::RemoveFailure { surface, .. } => Some(*surface),
        }
    }

    pub fn network_error(&self) -> &NetworkError {
        match self {
            AdError::InitializationFailure { source }
            | AdError::LoadFailure { source, .. }
            | AdError::ShowFailure { source, .. }
            | AdError::RemoveFailure { source, .. } => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdError>;
