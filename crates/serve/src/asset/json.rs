use super::ThemeAsset;
use domain::asset::AssetType;
use serde_json::Value as Json;

/// JSON asset (variables, fonts, scripts).
///
/// Construction never fails: invalid JSON leaves `data` as `null` and the
/// decode error is kept for callers that want to report it.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonAsset {
    json_string: String,
    data: Json,
    error: Option<String>,
}

impl JsonAsset {
    pub fn new(json_string: impl Into<String>) -> Self {
        let json_string = json_string.into();
        let (data, error) = match serde_json::from_str::<Json>(&json_string) {
            Ok(v) => (v, None),
            Err(e) => (Json::Null, Some(e.to_string())),
        };
        Self {
            json_string,
            data,
            error,
        }
    }

    /// Asset whose raw form is the compact encoding of `data`.
    pub fn from_value(data: Json) -> Self {
        Self {
            json_string: data.to_string(),
            data,
            error: None,
        }
    }

    pub(crate) fn with_error(data: Json, error: Option<String>) -> Self {
        Self {
            json_string: data.to_string(),
            data,
            error,
        }
    }

    pub fn data(&self) -> &Json {
        &self.data
    }

    /// Why the source failed to decode, if it did.
    pub fn decode_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Look up a dotted path such as `titleBar.logo.desktop.url`.
    ///
    /// Numeric segments index into arrays.
    pub fn get(&self, key: &str) -> Option<&Json> {
        let mut current = &self.data;
        for part in key.split('.') {
            current = match current {
                Json::Object(map) => map.get(part)?,
                Json::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// [`JsonAsset::get`] with a fallback for missing paths.
    pub fn get_or(&self, key: &str, default: Json) -> Json {
        self.get(key).cloned().unwrap_or(default)
    }
}

impl ThemeAsset for JsonAsset {
    fn default_type(&self) -> AssetType {
        AssetType::Json
    }

    fn content_type(&self) -> &'static str {
        AssetType::Json.content_type()
    }

    fn value(&self) -> Json {
        self.data.clone()
    }

    fn raw_str(&self) -> &str {
        &self.json_string
    }
}
