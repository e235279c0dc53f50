// crates/domain/src/asset.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Type tag of a theme asset.
///
/// The first six tags are the ones a theme can be authored in. `Image` is
/// only produced for logo assets derived from variables or configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Html,
    Twig,
    Json,
    Neon,
    Css,
    Js,
    Image,
}

impl AssetType {
    /// Tags accepted when constructing an asset from raw content.
    pub const AUTHORED: [AssetType; 6] = [
        AssetType::Html,
        AssetType::Twig,
        AssetType::Json,
        AssetType::Neon,
        AssetType::Css,
        AssetType::Js,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Html => "html",
            AssetType::Twig => "twig",
            AssetType::Json => "json",
            AssetType::Neon => "neon",
            AssetType::Css => "css",
            AssetType::Js => "js",
            AssetType::Image => "image",
        }
    }

    /// HTTP content type used when the raw form of this type is served.
    pub fn content_type(&self) -> &'static str {
        match self {
            AssetType::Html | AssetType::Twig => "text/html",
            AssetType::Json => "application/json",
            AssetType::Neon => "text/neon",
            AssetType::Css => "text/css",
            AssetType::Js => "application/javascript",
            AssetType::Image => "text/plain",
        }
    }

    /// Map a file extension or tag onto an authored type.
    ///
    /// Returns `None` for anything outside [`AssetType::AUTHORED`].
    pub fn from_authored(tag: &str) -> Option<Self> {
        match tag.parse::<AssetType>() {
            Ok(AssetType::Image) | Err(_) => None,
            Ok(t) => Some(t),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(AssetType::Html),
            "twig" => Ok(AssetType::Twig),
            "json" => Ok(AssetType::Json),
            "neon" => Ok(AssetType::Neon),
            "css" => Ok(AssetType::Css),
            "js" => Ok(AssetType::Js),
            "image" => Ok(AssetType::Image),
            other => Err(Error::UnknownAssetType(other.to_string())),
        }
    }
}
