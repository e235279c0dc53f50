// crates/adapt/src/service/memory.rs

use super::{ThemeService, CURRENT};
use crate::Error;
use async_trait::async_trait;
use domain::asset::AssetType;
use domain::slot;
use parking_lot::RwLock;
use serde_json::Value as Json;
use serve::asset::{JsonAsset, NeonAsset, ThemeAsset};
use serve::builder::{BuildOptions, RawAsset, ThemeBuilder, ThemeSource};
use serve::theme::Theme;
use serve::Error as ServeError;
use std::collections::BTreeMap;
use tracing::info;

struct StoredTheme {
    source: ThemeSource,
    base_version: String,
    revision: u64,
}

impl StoredTheme {
    fn new(source: ThemeSource) -> Self {
        Self {
            base_version: source.version.clone(),
            source,
            revision: 0,
        }
    }

    /// Every write changes the version, and with it every cache-busted URL.
    fn bump(&mut self) {
        self.revision += 1;
        self.source.version = format!("{}-{}", self.base_version, self.revision);
    }
}

/// Themes held in memory as raw sources, built on every read.
pub struct MemoryThemeService {
    builder: ThemeBuilder,
    themes: RwLock<BTreeMap<String, StoredTheme>>,
    current: RwLock<Option<String>>,
}

impl MemoryThemeService {
    /// `current` defaults to the first theme by ID.
    pub fn new(
        builder: ThemeBuilder,
        sources: impl IntoIterator<Item = ThemeSource>,
        current: Option<String>,
    ) -> Result<Self, Error> {
        let themes: BTreeMap<_, _> = sources
            .into_iter()
            .map(|s| (s.theme_id.clone(), StoredTheme::new(s)))
            .collect();

        let current = match current {
            Some(id) if !themes.contains_key(&id) => return Err(Error::ThemeNotFound(id)),
            Some(id) => Some(id),
            None => themes.keys().next().cloned(),
        };

        Ok(Self {
            builder,
            themes: RwLock::new(themes),
            current: RwLock::new(current),
        })
    }

    fn resolve_id(&self, key: &str) -> Result<String, Error> {
        if key == CURRENT {
            return self.current.read().clone().ok_or(Error::NoCurrentTheme);
        }
        Ok(key.to_string())
    }

    fn build(&self, theme_id: &str, options: BuildOptions) -> Result<Theme, Error> {
        let themes = self.themes.read();
        let stored = themes
            .get(theme_id)
            .ok_or_else(|| Error::ThemeNotFound(theme_id.to_string()))?;
        Ok(self.builder.build(&stored.source, options)?)
    }

    fn write<F>(&self, theme_id: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ThemeSource) -> Result<(), Error>,
    {
        let mut themes = self.themes.write();
        let stored = themes
            .get_mut(theme_id)
            .ok_or_else(|| Error::ThemeNotFound(theme_id.to_string()))?;
        f(&mut stored.source)?;
        stored.bump();
        info!(theme = theme_id, version = %stored.source.version, "theme updated");
        Ok(())
    }
}

fn not_found(asset_name: &str) -> Error {
    ServeError::NotFound(asset_name.to_string()).into()
}

/// Logos are computed on every build and have no stored source.
fn ensure_writable(asset_name: &str) -> Result<(), Error> {
    match asset_name {
        slot::LOGO | slot::MOBILE_LOGO => Err(Error::DerivedAsset(asset_name.to_string())),
        _ => Ok(()),
    }
}

#[async_trait]
impl ThemeService for MemoryThemeService {
    #[tracing::instrument(skip_all, fields(key = key))]
    async fn get_theme(&self, key: &str, options: BuildOptions) -> Result<Theme, Error> {
        let id = self.resolve_id(key)?;
        self.build(&id, options)
    }

    async fn get_themes(&self) -> Result<Vec<Theme>, Error> {
        let ids: Vec<String> = self.themes.read().keys().cloned().collect();
        ids.iter()
            .map(|id| self.build(id, BuildOptions::default()))
            .collect()
    }

    async fn current_theme(&self) -> Result<Theme, Error> {
        self.get_theme(CURRENT, BuildOptions::default()).await
    }

    #[tracing::instrument(skip_all, fields(theme = theme_id))]
    async fn set_current_theme(&self, theme_id: &str) -> Result<Theme, Error> {
        let theme = self.build(theme_id, BuildOptions::default())?;
        *self.current.write() = Some(theme_id.to_string());
        info!("current theme changed");
        Ok(theme)
    }

    #[tracing::instrument(skip_all, fields(theme = theme_id, asset = asset_name))]
    async fn set_asset(
        &self,
        theme_id: &str,
        asset_name: &str,
        body: String,
    ) -> Result<Theme, Error> {
        ensure_writable(asset_name)?;
        let id = self.resolve_id(theme_id)?;
        self.write(&id, |source| {
            let asset_type = match source.assets.get(asset_name) {
                Some(raw) => raw.asset_type,
                None => {
                    slot::slot(asset_name)
                        .ok_or_else(|| not_found(asset_name))?
                        .asset_type
                }
            };
            source.set_asset(asset_name, RawAsset::new(asset_type, body));
            Ok(())
        })?;
        self.build(&id, BuildOptions::default())
    }

    #[tracing::instrument(skip_all, fields(theme = theme_id, asset = asset_name))]
    async fn sparse_update_asset(
        &self,
        theme_id: &str,
        asset_name: &str,
        body: String,
    ) -> Result<Theme, Error> {
        ensure_writable(asset_name)?;
        let patch: Json =
            serde_json::from_str(&body).map_err(|e| Error::InvalidBody(e.to_string()))?;
        let id = self.resolve_id(theme_id)?;

        self.write(&id, |source| {
            let raw = source
                .assets
                .get(asset_name)
                .ok_or_else(|| not_found(asset_name))?;
            let mut data = match raw.asset_type {
                AssetType::Json => JsonAsset::new(raw.contents.as_str()).value(),
                AssetType::Neon => NeonAsset::new(raw.contents.as_str()).value(),
                _ => return Err(Error::NotJsonAsset(asset_name.to_string())),
            };
            json_patch::merge(&mut data, &patch);
            source.set_asset(asset_name, RawAsset::new(AssetType::Json, data.to_string()));
            Ok(())
        })?;
        self.build(&id, BuildOptions::default())
    }

    /// Slot assets fall back to their empty default; other assets go away.
    #[tracing::instrument(skip_all, fields(theme = theme_id, asset = asset_name))]
    async fn delete_asset(&self, theme_id: &str, asset_name: &str) -> Result<(), Error> {
        ensure_writable(asset_name)?;
        let id = self.resolve_id(theme_id)?;
        self.write(&id, |source| {
            if let Some(slot) = slot::slot(asset_name) {
                source.set_asset(asset_name, RawAsset::new(slot.asset_type, slot.default_raw));
                return Ok(());
            }
            source
                .assets
                .remove(asset_name)
                .map(|_| ())
                .ok_or_else(|| not_found(asset_name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::buster::DeploymentCacheBuster;
    use domain::config::JsonConfig;
    use serde_json::json;
    use serve::asset::Asset;
    use serve::factory::{AssetFactory, SiteUrl, UploadUrl};
    use serve::variables::{StaticVariables, VariableProviderRegistry};
    use std::sync::Arc;

    fn service(registry: VariableProviderRegistry) -> MemoryThemeService {
        let factory = AssetFactory::new(
            SiteUrl::new("https://f.example.com"),
            UploadUrl::default(),
            DeploymentCacheBuster::new("d"),
            Arc::new(JsonConfig::default()),
        );
        let builder = ThemeBuilder::new(Arc::new(factory), Arc::new(registry));

        let mut lavender = ThemeSource::with_defaults("lavender", "1.0");
        lavender.set_asset(
            "variables",
            RawAsset::new(AssetType::Neon, "global:\n  color: purple\n"),
        );
        lavender.set_asset("header", RawAsset::new(AssetType::Twig, "<h1>{{ 1 }}</h1>"));
        let plain = ThemeSource::with_defaults("plain", "2");

        MemoryThemeService::new(builder, [lavender, plain], None).unwrap()
    }

    #[tokio::test]
    async fn current_defaults_to_first_theme() {
        let svc = service(VariableProviderRegistry::new());
        assert_eq!(svc.current_theme().await.unwrap().theme_id(), "lavender");

        svc.set_current_theme("plain").await.unwrap();
        let theme = svc.get_theme(CURRENT, BuildOptions::default()).await.unwrap();
        assert_eq!(theme.theme_id(), "plain");
    }

    #[tokio::test]
    async fn unknown_current_theme_is_rejected() {
        let svc = service(VariableProviderRegistry::new());
        let err = svc.set_current_theme("nope").await.unwrap_err();
        assert_eq!(err.to_status(), http::StatusCode::NOT_FOUND);
        assert_eq!(svc.current_theme().await.unwrap().theme_id(), "lavender");
    }

    #[tokio::test]
    async fn lists_all_themes() {
        let svc = service(VariableProviderRegistry::new());
        let ids: Vec<_> = svc
            .get_themes()
            .await
            .unwrap()
            .iter()
            .map(|t| t.theme_id().to_string())
            .collect();
        assert_eq!(ids, vec!["lavender", "plain"]);
    }

    #[tokio::test]
    async fn set_asset_keeps_type_and_bumps_version() {
        let svc = service(VariableProviderRegistry::new());
        let theme = svc
            .set_asset("lavender", "header", "<h2>{{ 2 }}</h2>".into())
            .await
            .unwrap();

        assert!(matches!(theme.asset("header"), Some(Asset::Twig(_))));
        assert_eq!(theme.asset("header").unwrap().raw_str(), "<h2>{{ 2 }}</h2>");
        assert_eq!(theme.version(), "1.0-1");
    }

    #[tokio::test]
    async fn set_unknown_asset_is_not_found() {
        let svc = service(VariableProviderRegistry::new());
        let err = svc
            .set_asset("lavender", "frobnicate", String::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sparse_update_merges_into_neon_variables() {
        let svc = service(VariableProviderRegistry::new());
        let theme = svc
            .sparse_update_asset("lavender", "variables", r#"{"global":{"size":12}}"#.into())
            .await
            .unwrap();
        assert_eq!(
            theme.variables().unwrap().value(),
            json!({ "global": { "color": "purple", "size": 12 } })
        );
    }

    #[tokio::test]
    async fn sparse_update_rejects_non_json_assets_and_bodies() {
        let svc = service(VariableProviderRegistry::new());
        let err = svc
            .sparse_update_asset("lavender", "styles", "{}".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotJsonAsset(_)));

        let err = svc
            .sparse_update_asset("lavender", "variables", "{nope".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBody(_)));
        assert_eq!(err.to_status(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_resets_slot_to_default() {
        let svc = service(VariableProviderRegistry::new());
        svc.delete_asset("lavender", "variables").await.unwrap();
        let theme = svc
            .get_theme("lavender", BuildOptions::default())
            .await
            .unwrap();
        assert_eq!(theme.variables().unwrap().value(), json!({}));

        let err = svc.delete_asset("lavender", "extra").await.unwrap_err();
        assert_eq!(err.to_status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn logos_are_served_but_not_writable() {
        let mut registry = VariableProviderRegistry::new();
        registry.register(Arc::new(StaticVariables::new(
            "addon",
            json!({ "titleBar": { "logo": { "desktop": { "url": "d.png" } } } }),
        )));
        let svc = service(registry);
        let theme = svc
            .get_theme("lavender", BuildOptions::default())
            .await
            .unwrap();
        assert!(theme.asset("logo").is_some());

        let err = svc.delete_asset("lavender", "logo").await.unwrap_err();
        assert!(matches!(err, Error::DerivedAsset(_)));
        assert_eq!(err.to_status(), http::StatusCode::BAD_REQUEST);
        let err = svc
            .set_asset("lavender", "mobileLogo", "m.png".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DerivedAsset(_)));
        let err = svc
            .sparse_update_asset("lavender", "logo", "{}".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DerivedAsset(_)));

        let theme = svc
            .get_theme("lavender", BuildOptions::default())
            .await
            .unwrap();
        assert_eq!(theme.version(), "1.0");
    }

    #[tokio::test]
    async fn addon_variables_follow_build_options() {
        let mut registry = VariableProviderRegistry::new();
        registry.register(Arc::new(StaticVariables::new(
            "addon",
            json!({ "global": { "font": "Inter" } }),
        )));
        let svc = service(registry);

        let with = svc
            .get_theme("lavender", BuildOptions::default())
            .await
            .unwrap();
        assert_eq!(
            with.variables().unwrap().get("global.font"),
            Some(&json!("Inter"))
        );

        let without = svc
            .get_theme(
                "lavender",
                BuildOptions {
                    allow_addon_variables: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(without.variables().unwrap().get("global.font"), None);
    }
}
