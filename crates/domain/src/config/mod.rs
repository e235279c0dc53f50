// crates/domain/src/config/mod.rs

//! Read-only access to site configuration through dotted keys.

use serde_json::Value as Json;

/// Site configuration consumed by the asset pipeline.
///
/// Keys are dotted paths such as `Garden.Logo`.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Json>;

    /// String value of a key; empty strings count as missing.
    fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Json::String(s) if !s.is_empty() => Some(s),
            Json::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// `ConfigStore` over a JSON tree.
///
/// Segment matching is case-insensitive because layered configuration
/// sources may normalize key case on the way in.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    root: Json,
}

impl JsonConfig {
    pub fn new(root: Json) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Json {
        &self.root
    }
}

impl ConfigStore for JsonConfig {
    fn get(&self, key: &str) -> Option<Json> {
        let mut current = &self.root;
        for part in key.split('.') {
            let obj = current.as_object()?;
            current = match obj.get(part) {
                Some(v) => v,
                None => obj
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(part))
                    .map(|(_, v)| v)?,
            };
        }
        Some(current.clone())
    }
}
