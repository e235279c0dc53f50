use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as Json};
use std::{net::IpAddr, path::PathBuf};

use crate::buster::DeploymentCacheBuster;
use crate::config::JsonConfig;
use crate::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// IP address the HTTP API binds to
    pub ip: IpAddr,

    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SiteSettings {
    /// Prefix for generated asset URLs, e.g. `https://forum.example.com`
    #[serde(default)]
    pub base_url: String,

    /// Where uploaded files (logos) are served from.
    ///
    /// When unset, relative upload paths are returned as-is.
    pub upload_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeSettings {
    /// Directory holding one folder per theme
    pub dir: PathBuf,

    /// Theme ID served as "current" at startup
    pub current: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeploySettings {
    pub cache_buster: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub site: SiteSettings,
    pub themes: ThemeSettings,
    #[serde(default)]
    pub deploy: DeploySettings,

    /// Free-form `Garden.*` configuration (logos and friends).
    #[serde(default)]
    pub garden: JsonMap<String, Json>,

    /// Default theme variables contributed per addon, keyed by addon name.
    #[serde(default)]
    pub addon_variables: JsonMap<String, Json>,
}

impl Settings {
    /// Reject settings that deserialize but cannot work.
    pub fn validate(&self) -> Result<(), Error> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "must be non-zero"));
        }
        if self.themes.dir.as_os_str().is_empty() {
            return Err(invalid("themes.dir", "must not be empty"));
        }
        if let Some(url) = &self.site.upload_base_url {
            if url.is_empty() {
                return Err(invalid("site.upload_base_url", "must not be empty when set"));
            }
        }
        Ok(())
    }

    pub fn cache_buster(&self) -> DeploymentCacheBuster {
        match &self.deploy.cache_buster {
            Some(v) if !v.is_empty() => DeploymentCacheBuster::new(v.clone()),
            _ => DeploymentCacheBuster::from_start_time(),
        }
    }

    /// Configuration store rooted so that `Garden.Logo` resolves.
    pub fn config_store(&self) -> JsonConfig {
        let mut root = JsonMap::new();
        root.insert("Garden".to_string(), Json::Object(self.garden.clone()));
        JsonConfig::new(Json::Object(root))
    }
}

fn invalid(key: &str, reason: &str) -> Error {
    Error::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
