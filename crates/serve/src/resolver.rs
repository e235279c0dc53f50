// crates/serve/src/resolver.rs

//! Asset key resolution.
//!
//! An asset key names an asset and optionally the form to serve it in:
//!   - `header`      → the asset's JSON envelope
//!   - `header.html` → the asset rendered as HTML
//!
//! The extension is checked against the asset's allowed types before
//! anything is rendered.

use crate::asset::{Asset, RenderedAsset, ThemeAsset};
use crate::theme::Theme;
use crate::Error;
use domain::asset::AssetType;
use serde_json::Value as Json;

/// What an asset key resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetResponse {
    /// The asset in one of its native forms.
    Rendered(RenderedAsset),
    /// The asset's JSON envelope.
    Envelope(Json),
}

// -----------------------------------------------------------------------------
// Utility
// -----------------------------------------------------------------------------

/// Split an asset key into name and extension.
///
/// Only the last path segment counts, and only its last dot separates the
/// extension. A key without a dot has an empty extension.
pub fn split_asset_key(key: &str) -> (&str, &str) {
    let base = key.rsplit('/').next().unwrap_or(key);
    match base.rfind('.') {
        Some(i) => (&base[..i], &base[i + 1..]),
        None => (base, ""),
    }
}

// -----------------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------------

/// Find the asset a key names and the form it asks for.
///
/// `None` means the bare name was given. Nothing is rendered, so this is
/// safe to run before a write.
pub fn lookup_asset<'t>(
    theme: &'t Theme,
    key: &str,
) -> Result<(&'t Asset, Option<AssetType>), Error> {
    let (name, extension) = split_asset_key(key);

    let asset = theme
        .asset(name)
        .ok_or_else(|| Error::NotFound(name.to_string()))?;

    if extension.is_empty() {
        return Ok((asset, None));
    }

    let invalid = || Error::InvalidExtension {
        extension: extension.to_string(),
        asset: name.to_string(),
    };
    let as_type: AssetType = extension.parse().map_err(|_| invalid())?;
    if !asset.allowed_types().contains(&as_type) {
        return Err(invalid());
    }
    Ok((asset, Some(as_type)))
}

#[tracing::instrument(skip_all, fields(theme = %theme.theme_id(), key = key))]
pub fn resolve_asset(theme: &Theme, key: &str) -> Result<AssetResponse, Error> {
    match lookup_asset(theme, key)? {
        (asset, None) => Ok(AssetResponse::Envelope(asset.as_array()?)),
        (asset, as_type) => Ok(AssetResponse::Rendered(asset.render(as_type))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{HtmlAsset, JsonAsset, NeonAsset, TwigAsset};
    use http::StatusCode;
    use serde_json::json;

    fn theme() -> Theme {
        let mut theme = Theme::new("1", "1");
        theme
            .insert_asset("variables", JsonAsset::new(r#"{"a":1}"#).into())
            .unwrap();
        theme
            .insert_asset("fonts", NeonAsset::new("- Roboto").into())
            .unwrap();
        theme
            .insert_asset("header", TwigAsset::new("<p>{{ 2 * 3 }}</p>").into())
            .unwrap();
        theme
            .insert_asset("footer", HtmlAsset::new("<footer/>").into())
            .unwrap();
        theme
    }

    #[test]
    fn splits_on_last_dot_of_basename() {
        assert_eq!(split_asset_key("variables.json"), ("variables", "json"));
        assert_eq!(split_asset_key("variables"), ("variables", ""));
        assert_eq!(split_asset_key("a.b.css"), ("a.b", "css"));
        assert_eq!(split_asset_key("dir.x/styles"), ("styles", ""));
        assert_eq!(split_asset_key("header."), ("header", ""));
    }

    #[test]
    fn explicit_extension_renders() {
        let out = resolve_asset(&theme(), "variables.json").unwrap();
        let AssetResponse::Rendered(out) = out else {
            panic!("expected rendered asset")
        };
        assert_eq!(out.content_type, "application/json");
        assert_eq!(out.text(), r#"{"a":1}"#);
    }

    #[test]
    fn disallowed_extension_names_extension_and_asset() {
        let err = resolve_asset(&theme(), "variables.xml").unwrap_err();
        assert_eq!(err.to_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "invalid extension '.xml' for asset 'variables'"
        );
    }

    #[test]
    fn known_but_disallowed_type_is_rejected() {
        let err = resolve_asset(&theme(), "variables.neon").unwrap_err();
        assert!(matches!(err, Error::InvalidExtension { .. }));
        let err = resolve_asset(&theme(), "header.html").unwrap_err();
        assert!(matches!(err, Error::InvalidExtension { .. }));
    }

    #[test]
    fn every_allowed_type_renders() {
        let theme = theme();
        for (name, asset) in theme.assets() {
            for t in asset.allowed_types() {
                let key = format!("{name}.{t}");
                assert!(
                    matches!(resolve_asset(&theme, &key), Ok(AssetResponse::Rendered(_))),
                    "{key}"
                );
            }
        }
    }

    #[test]
    fn bare_name_returns_envelope() {
        let out = resolve_asset(&theme(), "variables").unwrap();
        assert_eq!(
            out,
            AssetResponse::Envelope(json!({ "data": { "a": 1 }, "type": "json" }))
        );

        let out = resolve_asset(&theme(), "header").unwrap();
        let AssetResponse::Envelope(v) = out else {
            panic!("expected envelope")
        };
        assert_eq!(v["data"], "<p>6</p>");
    }

    #[test]
    fn neon_asset_serves_both_forms() {
        let theme = theme();
        let AssetResponse::Rendered(json) = resolve_asset(&theme, "fonts.json").unwrap() else {
            panic!("expected rendered asset")
        };
        assert_eq!(json.text(), r#"["Roboto"]"#);
        let AssetResponse::Rendered(neon) = resolve_asset(&theme, "fonts.neon").unwrap() else {
            panic!("expected rendered asset")
        };
        assert_eq!(neon.text(), "- Roboto");
        assert_eq!(neon.content_type, "text/neon");
    }

    #[test]
    fn lookup_checks_without_rendering() {
        let theme = theme();
        let (asset, as_type) = lookup_asset(&theme, "fonts.neon").unwrap();
        assert_eq!(asset.default_type(), AssetType::Neon);
        assert_eq!(as_type, Some(AssetType::Neon));
        assert_eq!(lookup_asset(&theme, "fonts").unwrap().1, None);
        assert!(lookup_asset(&theme, "fonts.xml").is_err());
    }

    #[test]
    fn unknown_asset_is_not_found_for_any_extension() {
        for key in ["frobnicate.html", "frobnicate.xml", "frobnicate"] {
            let err = resolve_asset(&theme(), key).unwrap_err();
            assert!(matches!(err, Error::NotFound(ref n) if n == "frobnicate"), "{key}");
            assert_eq!(err.to_status(), StatusCode::NOT_FOUND);
        }
    }
}
