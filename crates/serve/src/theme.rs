// crates/serve/src/theme.rs

use crate::asset::{Asset, JsonAsset, ThemeAsset};
use crate::Error;
use domain::slot;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A theme and the assets it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    theme_id: String,
    name: String,
    version: String,
    assets: BTreeMap<String, Asset>,
}

impl Theme {
    pub fn new(theme_id: impl Into<String>, version: impl Into<String>) -> Self {
        let theme_id = theme_id.into();
        Self {
            name: theme_id.clone(),
            theme_id,
            version: version.into(),
            assets: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn theme_id(&self) -> &str {
        &self.theme_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version used for cache busting.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Add or replace an asset.
    ///
    /// Known slots only take assets of a compatible type.
    pub fn insert_asset(&mut self, name: impl Into<String>, asset: Asset) -> Result<(), Error> {
        let name = name.into();
        if let Some(slot) = slot::constrained_slot(&name) {
            if !slot.accepts(asset.default_type()) {
                return Err(Error::SlotMismatch {
                    asset: name,
                    found: asset.default_type(),
                    declared: slot.asset_type,
                });
            }
        }
        self.assets.insert(name, asset);
        Ok(())
    }

    pub fn remove_asset(&mut self, name: &str) -> Option<Asset> {
        self.assets.remove(name)
    }

    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    pub fn assets(&self) -> &BTreeMap<String, Asset> {
        &self.assets
    }

    /// The variables asset, whether authored as JSON or NEON.
    pub fn variables(&self) -> Option<&JsonAsset> {
        self.asset(slot::VARIABLES).and_then(Asset::as_json)
    }
}

impl Serialize for Theme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Theme", 4)?;
        s.serialize_field("themeID", &self.theme_id)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("version", &self.version)?;
        s.serialize_field("assets", &self.assets)?;
        s.end()
    }
}
