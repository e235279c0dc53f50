// crates/adapt/src/loader.rs

//! Load theme sources from a directory tree.
//!
//! ```text
//! themes/
//!   lavender/
//!     theme.toml        # optional: name, version
//!     header.twig
//!     variables.neon
//!     styles.css
//! ```

use crate::Error;
use domain::slot::SLOTS;
use serde::Deserialize;
use serve::builder::{RawAsset, ThemeSource};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

const MANIFEST: &str = "theme.toml";
const DEFAULT_VERSION: &str = "1";

#[derive(Debug, Default, Deserialize)]
struct ThemeManifest {
    name: Option<String>,
    version: Option<String>,
}

/// Load every theme directory directly under `root`, sorted by ID.
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn load_themes(root: &Path) -> Result<Vec<ThemeSource>, Error> {
    let mut themes = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let theme_id = entry.file_name().to_string_lossy().into_owned();
        themes.push(load_theme(entry.path(), &theme_id)?);
    }
    info!(count = themes.len(), "themes loaded");
    Ok(themes)
}

/// Load one theme directory.
///
/// Each slot takes the first file found among its compatible types; the
/// declared type is tried last. Slots with no file keep their default.
pub fn load_theme(dir: &Path, theme_id: &str) -> Result<ThemeSource, Error> {
    let manifest = read_manifest(dir)?;
    let mut source = ThemeSource::with_defaults(
        theme_id,
        manifest.version.as_deref().unwrap_or(DEFAULT_VERSION),
    );
    if let Some(name) = manifest.name {
        source.name = name;
    }

    for slot in SLOTS.iter() {
        let declared = slot.asset_type;
        let candidates = slot
            .compatible_types()
            .iter()
            .copied()
            .filter(|t| *t != declared)
            .chain(std::iter::once(declared));

        for t in candidates {
            let path = dir.join(format!("{}.{}", slot.name, t));
            if !path.is_file() {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            debug!(file = %path.display(), "loaded asset");
            source.set_asset(slot.name, RawAsset::new(t, contents));
            break;
        }
    }

    Ok(source)
}

fn read_manifest(dir: &Path) -> Result<ThemeManifest, Error> {
    let path = dir.join(MANIFEST);
    if !path.is_file() {
        return Ok(ThemeManifest::default());
    }
    let text = fs::read_to_string(&path)?;
    toml::from_str(&text).map_err(|e| Error::load(path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::asset::AssetType;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn loads_each_directory_as_a_theme() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("zeta")).unwrap();
        fs::create_dir(root.path().join("alpha")).unwrap();
        write(root.path(), "README.md", "not a theme");

        let themes = load_themes(root.path()).unwrap();
        let ids: Vec<_> = themes.iter().map(|t| t.theme_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
        assert_eq!(themes[0].version, "1");
        assert_eq!(themes[0].name, "alpha");
    }

    #[test]
    fn empty_theme_gets_slot_defaults() {
        let root = TempDir::new().unwrap();
        let source = load_theme(root.path(), "empty").unwrap();
        assert_eq!(source.assets.len(), 7);
        assert_eq!(
            source.assets["variables"],
            RawAsset::new(AssetType::Json, "{}")
        );
        assert_eq!(source.assets["fonts"], RawAsset::new(AssetType::Json, "[]"));
    }

    #[test]
    fn twig_and_neon_win_over_declared_types() {
        let root = TempDir::new().unwrap();
        write(root.path(), "header.html", "<h1>static</h1>");
        write(root.path(), "header.twig", "<h1>{{ title }}</h1>");
        write(root.path(), "variables.neon", "a: 1");
        write(root.path(), "footer.html", "<footer/>");
        write(root.path(), "styles.css", "body {}");

        let source = load_theme(root.path(), "t").unwrap();
        assert_eq!(source.assets["header"].asset_type, AssetType::Twig);
        assert_eq!(source.assets["variables"].asset_type, AssetType::Neon);
        assert_eq!(source.assets["footer"].contents, "<footer/>");
        assert_eq!(source.assets["styles"].contents, "body {}");
    }

    #[test]
    fn manifest_sets_name_and_version() {
        let root = TempDir::new().unwrap();
        write(root.path(), "theme.toml", "name = \"Lavender\"\nversion = \"2.1\"\n");
        let source = load_theme(root.path(), "lavender").unwrap();
        assert_eq!(source.name, "Lavender");
        assert_eq!(source.version, "2.1");
    }

    #[test]
    fn broken_manifest_is_a_load_error() {
        let root = TempDir::new().unwrap();
        write(root.path(), "theme.toml", "name = ");
        let err = load_theme(root.path(), "t").unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }
}
