use super::ThemeAsset;
use crate::Error;
use domain::asset::AssetType;
use serde_json::{json, Value as Json};

/// Stylesheet served from a cache-busted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssAsset {
    data: String,
    url: String,
}

impl CssAsset {
    pub fn new(data: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ThemeAsset for CssAsset {
    fn default_type(&self) -> AssetType {
        AssetType::Css
    }

    fn content_type(&self) -> &'static str {
        AssetType::Css.content_type()
    }

    fn value(&self) -> Json {
        Json::String(self.data.clone())
    }

    fn raw_str(&self) -> &str {
        &self.data
    }

    fn as_array(&self) -> Result<Json, Error> {
        Ok(json!({
            "data": self.data,
            "type": AssetType::Css,
            "url": self.url,
        }))
    }
}

/// Theme javascript served from a cache-busted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsAsset {
    data: String,
    url: String,
}

impl JsAsset {
    pub fn new(data: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ThemeAsset for JsAsset {
    fn default_type(&self) -> AssetType {
        AssetType::Js
    }

    fn content_type(&self) -> &'static str {
        AssetType::Js.content_type()
    }

    fn value(&self) -> Json {
        Json::String(self.data.clone())
    }

    fn raw_str(&self) -> &str {
        &self.data
    }

    fn as_array(&self) -> Result<Json, Error> {
        Ok(json!({
            "data": self.data,
            "type": AssetType::Js,
            "url": self.url,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_envelope_carries_url() {
        let asset = CssAsset::new("body{}", "/api/v2/1/styles.css?v=1-2");
        assert_eq!(
            asset.as_array().unwrap(),
            json!({ "data": "body{}", "type": "css", "url": "/api/v2/1/styles.css?v=1-2" })
        );
        assert_eq!(asset.render(None).content_type, "text/css");
    }

    #[test]
    fn js_renders_raw_script() {
        let asset = JsAsset::new("console.log(1)", "/x.js");
        let out = asset.render(Some(AssetType::Js));
        assert_eq!(out.text(), "console.log(1)");
        assert_eq!(out.content_type, "application/javascript");
        assert_eq!(asset.url(), "/x.js");
    }
}
