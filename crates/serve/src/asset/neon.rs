use super::{JsonAsset, RenderedAsset, ThemeAsset};
use crate::neon;
use domain::asset::AssetType;
use serde_json::Value as Json;

/// JSON asset authored in NEON syntax.
///
/// Holds the original source next to a [`JsonAsset`] of the decoded data,
/// so it can be served in either form.
#[derive(Debug, Clone, PartialEq)]
pub struct NeonAsset {
    neon_string: String,
    json: JsonAsset,
}

impl NeonAsset {
    pub fn new(neon_string: impl Into<String>) -> Self {
        let neon_string = neon_string.into();
        let json = match neon::decode(&neon_string) {
            Ok(data) => JsonAsset::from_value(data),
            Err(e) => JsonAsset::with_error(Json::Null, Some(e.to_string())),
        };
        Self { neon_string, json }
    }

    pub fn neon_source(&self) -> &str {
        &self.neon_string
    }

    pub fn json(&self) -> &JsonAsset {
        &self.json
    }
}

impl ThemeAsset for NeonAsset {
    fn default_type(&self) -> AssetType {
        AssetType::Neon
    }

    fn content_type(&self) -> &'static str {
        AssetType::Neon.content_type()
    }

    fn value(&self) -> Json {
        self.json.value()
    }

    /// The JSON encoding; NEON assets honor the JSON asset contract.
    fn raw_str(&self) -> &str {
        self.json.raw_str()
    }

    fn allowed_types(&self) -> Vec<AssetType> {
        vec![AssetType::Json, AssetType::Neon]
    }

    /// `neon` serves the original source; anything else serves JSON.
    fn render(&self, as_type: Option<AssetType>) -> RenderedAsset {
        match as_type {
            Some(AssetType::Neon) => {
                RenderedAsset::new(self.neon_string.clone(), self.content_type())
            }
            _ => RenderedAsset::new(
                self.json.raw_str().to_owned(),
                AssetType::Json.content_type(),
            ),
        }
    }
}
