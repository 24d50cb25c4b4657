use serde::{Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error(transparent)]
    Ads(#[from] adpace_ads::AdError),
}

impl Serialize for PluginError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PluginError>;
