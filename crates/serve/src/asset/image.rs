use super::ThemeAsset;
use domain::asset::AssetType;
use serde_json::Value as Json;

/// Logo image, known only by its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    url: String,
}

impl ImageAsset {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ThemeAsset for ImageAsset {
    fn default_type(&self) -> AssetType {
        AssetType::Image
    }

    fn content_type(&self) -> &'static str {
        AssetType::Image.content_type()
    }

    fn value(&self) -> Json {
        Json::String(self.url.clone())
    }

    fn raw_str(&self) -> &str {
        &self.url
    }
}
