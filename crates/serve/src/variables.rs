// crates/serve/src/variables.rs

//! Default theme variables contributed by addons.

use crate::asset::JsonAsset;
use serde_json::{Map as JsonMap, Value as Json};
use std::fmt;
use std::sync::Arc;

/// Source of default theme variables.
pub trait VariableProvider: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn variables(&self) -> Json;
}

/// Provider backed by a fixed JSON value.
#[derive(Debug, Clone)]
pub struct StaticVariables {
    name: String,
    variables: Json,
}

impl StaticVariables {
    pub fn new(name: impl Into<String>, variables: Json) -> Self {
        Self {
            name: name.into(),
            variables,
        }
    }
}

impl VariableProvider for StaticVariables {
    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&self) -> Json {
        self.variables.clone()
    }
}

/// Ordered set of variable providers.
///
/// Built once at startup and shared by reference. Later providers win over
/// earlier ones, and a theme's own variables win over all of them.
#[derive(Clone, Default)]
pub struct VariableProviderRegistry {
    providers: Vec<Arc<dyn VariableProvider>>,
}

impl fmt::Debug for VariableProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

impl VariableProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn VariableProvider>) {
        tracing::debug!(provider = provider.name(), "registered variable provider");
        self.providers.push(provider);
    }

    /// Drop every provider.
    pub fn reset(&mut self) {
        self.providers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// All provider variables merged in registration order.
    pub fn merged_variables(&self) -> Json {
        let mut merged = Json::Object(JsonMap::new());
        for p in &self.providers {
            json_patch::merge(&mut merged, &p.variables());
        }
        merged
    }

    /// Merge a theme's variables over the provider defaults.
    ///
    /// Objects merge key by key. Any other theme value, `null` included,
    /// replaces the default. Returns `None` when there is nothing to merge,
    /// in which case the theme's own asset should be used as is.
    pub fn apply_to(&self, theme_vars: Option<&JsonAsset>) -> Option<JsonAsset> {
        if self.is_empty() {
            return None;
        }
        let mut merged = self.merged_variables();
        let error = match theme_vars {
            Some(vars) => {
                // Undecodable variables are null; keep the defaults.
                if !vars.data().is_null() {
                    overlay(&mut merged, vars.data());
                }
                vars.decode_error().map(str::to_string)
            }
            None => None,
        };
        Some(JsonAsset::with_error(merged, error))
    }
}

fn overlay(base: &mut Json, top: &Json) {
    if let (Json::Object(base), Json::Object(top)) = (&mut *base, top) {
        for (k, v) in top {
            overlay(base.entry(k.clone()).or_insert(Json::Null), v);
        }
        return;
    }
    *base = top.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ThemeAsset;
    use serde_json::json;

    fn registry() -> VariableProviderRegistry {
        let mut r = VariableProviderRegistry::new();
        r.register(Arc::new(StaticVariables::new(
            "colors",
            json!({ "global": { "mainColors": { "primary": "#000", "bg": "#fff" } } }),
        )));
        r.register(Arc::new(StaticVariables::new(
            "brand",
            json!({ "global": { "mainColors": { "primary": "#0291db" } } }),
        )));
        r
    }

    #[test]
    fn later_providers_win() {
        assert_eq!(
            registry().merged_variables(),
            json!({ "global": { "mainColors": { "primary": "#0291db", "bg": "#fff" } } })
        );
    }

    #[test]
    fn theme_variables_win_over_providers() {
        let vars = JsonAsset::new(r##"{"global":{"mainColors":{"bg":"#111"}},"x":1}"##);
        let merged = registry().apply_to(Some(&vars)).unwrap();
        assert_eq!(
            merged.value(),
            json!({
                "global": { "mainColors": { "primary": "#0291db", "bg": "#111" } },
                "x": 1
            })
        );
    }

    #[test]
    fn theme_nulls_survive_the_merge() {
        let vars = JsonAsset::new(r#"{"global":{"mainColors":{"bg":null}},"x":null}"#);
        let merged = registry().apply_to(Some(&vars)).unwrap();
        assert_eq!(
            merged.value(),
            json!({
                "global": { "mainColors": { "primary": "#0291db", "bg": null } },
                "x": null
            })
        );
    }

    #[test]
    fn empty_registry_leaves_variables_alone() {
        let vars = JsonAsset::new("{}");
        assert!(VariableProviderRegistry::new().apply_to(Some(&vars)).is_none());
    }

    #[test]
    fn providers_fill_missing_variables() {
        let merged = registry().apply_to(None).unwrap();
        assert_eq!(merged.get("global.mainColors.bg"), Some(&json!("#fff")));
    }

    #[test]
    fn reset_drops_providers() {
        let mut r = registry();
        assert_eq!(r.len(), 2);
        r.reset();
        assert!(r.is_empty());
        assert_eq!(r.merged_variables(), json!({}));
    }
}
