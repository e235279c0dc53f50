// crates/edge/src/settings.rs

//! Layered settings: built-in defaults, an optional TOML file, then
//! `FORUMTHEME__*` environment variables.

use crate::Error;
use config::{Config, Environment, File, FileFormat};
use domain::setting::Settings;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "FORUMTHEME";

#[tracing::instrument(skip_all)]
pub fn load_settings(file: Option<&Path>, themes_dir: Option<PathBuf>) -> Result<Settings, Error> {
    let mut builder = Config::builder()
        .set_default("server.ip", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("themes.dir", "themes")?;

    if let Some(path) = file {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__"),
    );

    if let Some(dir) = themes_dir {
        builder = builder.set_override("themes.dir", dir.to_string_lossy().into_owned())?;
    }

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::config::ConfigStore;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_a_file() {
        let s = load_settings(None, None).unwrap();
        assert_eq!(s.server.port, 8080);
        assert_eq!(s.themes.dir, PathBuf::from("themes"));
        assert!(s.themes.current.is_none());
    }

    #[test]
    fn file_values_and_cli_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forumtheme.toml");
        fs::write(
            &path,
            r##"
[server]
ip = "0.0.0.0"
port = 9000

[site]
base_url = "https://forum.example.com"

[themes]
dir = "/srv/themes"
current = "lavender"

[deploy]
cache_buster = "abc"

[garden]
Logo = "uploads/logo.png"

[addon_variables.brand]
global = { mainColors = { primary = "#0291db" } }
"##,
        )
        .unwrap();

        let s = load_settings(Some(&path), Some(PathBuf::from("/tmp/other"))).unwrap();
        assert_eq!(s.server.port, 9000);
        assert_eq!(s.site.base_url, "https://forum.example.com");
        assert_eq!(s.themes.dir, PathBuf::from("/tmp/other"));
        assert_eq!(s.themes.current.as_deref(), Some("lavender"));
        assert_eq!(s.cache_buster().value(), "abc");
        assert_eq!(
            s.config_store().get_str("Garden.Logo").as_deref(),
            Some("uploads/logo.png")
        );
        assert!(s.addon_variables.contains_key("brand"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/forumtheme.toml")), None);
        assert!(matches!(err, Err(Error::Config(_))));
    }
}
