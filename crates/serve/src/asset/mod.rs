// crates/serve/src/asset/mod.rs

//! Theme assets.
//!
//! Every variant is a small struct implementing [`ThemeAsset`]. [`Asset`]
//! closes the set and is what themes store.

mod css;
mod html;
mod image;
mod json;
mod neon;
mod twig;

pub use css::{CssAsset, JsAsset};
pub use html::HtmlAsset;
pub use image::ImageAsset;
pub use json::JsonAsset;
pub use neon::NeonAsset;
pub use twig::TwigAsset;

use crate::Error;
use bytes::Bytes;
use domain::asset::AssetType;
use serde::{Serialize, Serializer};
use serde_json::{json, Value as Json};

/// Response payload of an asset rendered in one of its native forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAsset {
    pub body: Bytes,
    pub content_type: &'static str,
}

impl RenderedAsset {
    pub fn new(body: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self {
            body: body.into(),
            content_type,
        }
    }

    /// Body as text; assets only ever render UTF-8.
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

/// Shared capability of all theme assets.
pub trait ThemeAsset {
    fn default_type(&self) -> AssetType;

    /// HTTP content type of the raw form.
    fn content_type(&self) -> &'static str;

    /// Decoded value: structured data for JSON-like assets, a string for
    /// text assets.
    fn value(&self) -> Json;

    /// Canonical serialized form.
    fn raw_str(&self) -> &str;

    /// Types this asset can be rendered as.
    fn allowed_types(&self) -> Vec<AssetType> {
        vec![self.default_type()]
    }

    /// Render the asset.
    ///
    /// `as_type` must already have been checked against
    /// [`ThemeAsset::allowed_types`]; the default implementation ignores it.
    fn render(&self, _as_type: Option<AssetType>) -> RenderedAsset {
        RenderedAsset::new(self.raw_str().to_owned(), self.content_type())
    }

    /// JSON envelope of the asset.
    fn as_array(&self) -> Result<Json, Error> {
        Ok(json!({
            "data": self.value(),
            "type": self.default_type(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Html(HtmlAsset),
    Twig(TwigAsset),
    Json(JsonAsset),
    Neon(NeonAsset),
    Css(CssAsset),
    Js(JsAsset),
    Image(ImageAsset),
}

impl Asset {
    fn inner(&self) -> &dyn ThemeAsset {
        match self {
            Asset::Html(a) => a,
            Asset::Twig(a) => a,
            Asset::Json(a) => a,
            Asset::Neon(a) => a,
            Asset::Css(a) => a,
            Asset::Js(a) => a,
            Asset::Image(a) => a,
        }
    }

    /// JSON view of the asset, for both `.json` and `.neon` sources.
    pub fn as_json(&self) -> Option<&JsonAsset> {
        match self {
            Asset::Json(a) => Some(a),
            Asset::Neon(a) => Some(a.json()),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageAsset> {
        match self {
            Asset::Image(a) => Some(a),
            _ => None,
        }
    }
}

impl ThemeAsset for Asset {
    fn default_type(&self) -> AssetType {
        self.inner().default_type()
    }

    fn content_type(&self) -> &'static str {
        self.inner().content_type()
    }

    fn value(&self) -> Json {
        self.inner().value()
    }

    fn raw_str(&self) -> &str {
        self.inner().raw_str()
    }

    fn allowed_types(&self) -> Vec<AssetType> {
        self.inner().allowed_types()
    }

    fn render(&self, as_type: Option<AssetType>) -> RenderedAsset {
        self.inner().render(as_type)
    }

    fn as_array(&self) -> Result<Json, Error> {
        self.inner().as_array()
    }
}

impl Serialize for Asset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_array()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl From<HtmlAsset> for Asset {
    fn from(a: HtmlAsset) -> Self {
        Asset::Html(a)
    }
}

impl From<TwigAsset> for Asset {
    fn from(a: TwigAsset) -> Self {
        Asset::Twig(a)
    }
}

impl From<JsonAsset> for Asset {
    fn from(a: JsonAsset) -> Self {
        Asset::Json(a)
    }
}

impl From<NeonAsset> for Asset {
    fn from(a: NeonAsset) -> Self {
        Asset::Neon(a)
    }
}

impl From<CssAsset> for Asset {
    fn from(a: CssAsset) -> Self {
        Asset::Css(a)
    }
}

impl From<JsAsset> for Asset {
    fn from(a: JsAsset) -> Self {
        Asset::Js(a)
    }
}

impl From<ImageAsset> for Asset {
    fn from(a: ImageAsset) -> Self {
        Asset::Image(a)
    }
}
