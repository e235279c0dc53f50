// crates/serve/src/factory.rs

use crate::asset::{
    Asset, CssAsset, HtmlAsset, ImageAsset, JsAsset, JsonAsset, NeonAsset, TwigAsset,
};
use crate::theme::Theme;
use domain::asset::AssetType;
use domain::buster::DeploymentCacheBuster;
use domain::config::ConfigStore;
use domain::slot;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

const CONFIG_LOGO: &str = "Garden.Logo";
const CONFIG_MOBILE_LOGO: &str = "Garden.MobileLogo";

/// Builds absolute URLs for paths on this site.
#[derive(Debug, Clone, Default)]
pub struct SiteUrl {
    base: String,
}

impl SiteUrl {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn simple_url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }
}

/// Turns stored upload paths into public URLs.
#[derive(Debug, Clone, Default)]
pub struct UploadUrl {
    base: Option<String>,
}

impl UploadUrl {
    pub fn new(base: Option<String>) -> Self {
        Self { base }
    }

    /// Absolute and protocol-relative URLs pass through. Relative paths
    /// are joined to the upload base, or returned unchanged without one.
    pub fn url(&self, name: &str) -> String {
        if name.contains("://") || name.starts_with("//") {
            return name.to_string();
        }
        match &self.base {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                name.trim_start_matches('/')
            ),
            None => name.to_string(),
        }
    }
}

/// Creates typed assets from raw theme content.
pub struct AssetFactory {
    site: SiteUrl,
    uploads: UploadUrl,
    cache_buster: DeploymentCacheBuster,
    config: Arc<dyn ConfigStore>,
}

impl AssetFactory {
    pub fn new(
        site: SiteUrl,
        uploads: UploadUrl,
        cache_buster: DeploymentCacheBuster,
        config: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            site,
            uploads,
            cache_buster,
            config,
        }
    }

    /// Create an asset of `asset_type` for `theme`.
    ///
    /// Unknown type tags yield `None` so callers can probe.
    #[tracing::instrument(skip_all, fields(theme = %theme.theme_id(), asset = asset_name, asset_type = asset_type))]
    pub fn create_asset(
        &self,
        theme: &Theme,
        asset_type: &str,
        asset_name: &str,
        contents: &str,
    ) -> Option<Asset> {
        let Some(kind) = AssetType::from_authored(asset_type) else {
            debug!("unknown asset type");
            return None;
        };

        let asset: Asset = match kind {
            AssetType::Html => HtmlAsset::new(contents).into(),
            AssetType::Twig => TwigAsset::new(contents).into(),
            AssetType::Json => JsonAsset::new(contents).into(),
            AssetType::Neon => NeonAsset::new(contents).into(),
            AssetType::Js => JsAsset::new(contents, self.asset_url(theme, kind, asset_name)).into(),
            AssetType::Css => {
                CssAsset::new(contents, self.asset_url(theme, kind, asset_name)).into()
            }
            AssetType::Image => return None,
        };

        if let Some(err) = asset.as_json().and_then(JsonAsset::decode_error) {
            warn!(error = err, "asset source does not decode; serving null data");
        }
        Some(asset)
    }

    /// Logo assets for a theme.
    ///
    /// Theme variables win over site configuration. At both levels the
    /// mobile logo falls back to the desktop one.
    pub fn logo_assets(&self, variables: Option<&JsonAsset>) -> BTreeMap<String, Asset> {
        let mut desktop: Option<String> = None;
        let mut mobile: Option<String> = None;

        if let Some(vars) = variables {
            desktop = non_empty(vars.get("titleBar.logo.desktop.url"));
            mobile = match vars.get("titleBar.logo.mobile.url") {
                Some(v) => non_empty(Some(v)),
                None => desktop.clone(),
            };
        }

        if desktop.is_none() {
            let desktop_config = self.config.get_str(CONFIG_LOGO);
            let mobile_config = match self.config.get(CONFIG_MOBILE_LOGO) {
                Some(_) => self.config.get_str(CONFIG_MOBILE_LOGO),
                None => desktop_config.clone(),
            };

            if let Some(path) = desktop_config {
                desktop = Some(self.uploads.url(&path));
            }
            if let Some(path) = mobile_config {
                mobile = Some(self.uploads.url(&path));
            }
        }

        let mut logos = BTreeMap::new();
        if let Some(url) = desktop {
            logos.insert(slot::LOGO.to_string(), ImageAsset::new(url).into());
        }
        if let Some(url) = mobile {
            logos.insert(slot::MOBILE_LOGO.to_string(), ImageAsset::new(url).into());
        }
        logos
    }

    fn asset_url(&self, theme: &Theme, kind: AssetType, asset_name: &str) -> String {
        let buster = self.theme_asset_cache_buster(theme);
        self.site.simple_url(&format!(
            "/api/v2/{}/{}.{}?v={}",
            theme.theme_id(),
            asset_name,
            kind,
            buster
        ))
    }

    fn theme_asset_cache_buster(&self, theme: &Theme) -> String {
        format!("{}-{}", theme.version(), self.cache_buster.value())
    }
}

fn non_empty(value: Option<&Json>) -> Option<String> {
    match value? {
        Json::String(s) if !s.is_empty() => Some(s.clone()),
        Json::Null | Json::Bool(false) | Json::String(_) => None,
        other => Some(other.to_string()),
    }
}
