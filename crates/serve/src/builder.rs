// crates/serve/src/builder.rs

//! Assemble [`Theme`] values from raw asset sources.

use crate::factory::AssetFactory;
use crate::theme::Theme;
use crate::variables::VariableProviderRegistry;
use crate::Error;
use domain::asset::AssetType;
use domain::slot::{self, SLOTS};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Raw source of a single asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAsset {
    pub asset_type: AssetType,
    pub contents: String,
}

impl RawAsset {
    pub fn new(asset_type: AssetType, contents: impl Into<String>) -> Self {
        Self {
            asset_type,
            contents: contents.into(),
        }
    }
}

/// Everything needed to build a theme, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSource {
    pub theme_id: String,
    pub name: String,
    pub version: String,
    pub assets: BTreeMap<String, RawAsset>,
}

impl ThemeSource {
    /// A theme whose slots all hold their empty defaults.
    pub fn with_defaults(theme_id: impl Into<String>, version: impl Into<String>) -> Self {
        let theme_id = theme_id.into();
        let assets = SLOTS
            .iter()
            .map(|s| (s.name.to_string(), RawAsset::new(s.asset_type, s.default_raw)))
            .collect();
        Self {
            name: theme_id.clone(),
            theme_id,
            version: version.into(),
            assets,
        }
    }

    pub fn set_asset(&mut self, name: impl Into<String>, raw: RawAsset) {
        self.assets.insert(name.into(), raw);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Merge variables from registered providers.
    pub allow_addon_variables: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            allow_addon_variables: true,
        }
    }
}

pub struct ThemeBuilder {
    factory: Arc<AssetFactory>,
    registry: Arc<VariableProviderRegistry>,
}

impl ThemeBuilder {
    pub fn new(factory: Arc<AssetFactory>, registry: Arc<VariableProviderRegistry>) -> Self {
        Self { factory, registry }
    }

    pub fn factory(&self) -> &AssetFactory {
        &self.factory
    }

    #[tracing::instrument(skip_all, fields(theme = %source.theme_id))]
    pub fn build(&self, source: &ThemeSource, options: BuildOptions) -> Result<Theme, Error> {
        let mut theme =
            Theme::new(source.theme_id.clone(), source.version.clone()).with_name(&source.name);

        for (name, raw) in &source.assets {
            match self
                .factory
                .create_asset(&theme, raw.asset_type.as_str(), name, &raw.contents)
            {
                Some(asset) => theme.insert_asset(name.clone(), asset)?,
                None => debug!(asset = %name, "skipping asset with no authored form"),
            }
        }

        if options.allow_addon_variables {
            if let Some(merged) = self.registry.apply_to(theme.variables()) {
                theme.insert_asset(slot::VARIABLES, merged.into())?;
            }
        }

        for (name, logo) in self.factory.logo_assets(theme.variables()) {
            theme.insert_asset(name, logo)?;
        }

        Ok(theme)
    }
}
