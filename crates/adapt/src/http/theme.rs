// crates/adapt/src/http/theme.rs

//! Theme API handlers.

use super::app::AppState;
use super::error::HttpError;
use crate::service::ThemeService;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::{header, StatusCode};
use serde::Deserialize;
use serve::builder::BuildOptions;
use serve::resolver::{lookup_asset, resolve_asset, split_asset_key, AssetResponse};
use serve::theme::Theme;

#[derive(Debug, Default, Deserialize)]
pub struct ThemeQuery {
    #[serde(rename = "allowAddonVariables")]
    pub allow_addon_variables: Option<bool>,
}

impl ThemeQuery {
    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            allow_addon_variables: self.allow_addon_variables.unwrap_or(true),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetCurrent {
    #[serde(rename = "themeID")]
    pub theme_id: String,
}

pub async fn list_themes(State(state): State<AppState>) -> Result<Json<Vec<Theme>>, HttpError> {
    Ok(Json(state.themes.get_themes().await?))
}

pub async fn get_current(State(state): State<AppState>) -> Result<Json<Theme>, HttpError> {
    Ok(Json(state.themes.current_theme().await?))
}

pub async fn put_current(
    State(state): State<AppState>,
    Json(body): Json<SetCurrent>,
) -> Result<Json<Theme>, HttpError> {
    Ok(Json(state.themes.set_current_theme(&body.theme_id).await?))
}

pub async fn get_theme(
    State(state): State<AppState>,
    Path(theme_key): Path<String>,
    query: Result<Query<ThemeQuery>, QueryRejection>,
) -> Result<Json<Theme>, HttpError> {
    let Query(query) = query.map_err(|e| HttpError::Query(e.body_text()))?;
    let theme = state
        .themes
        .get_theme(&theme_key, query.build_options())
        .await?;
    Ok(Json(theme))
}

pub async fn get_asset(
    State(state): State<AppState>,
    Path((theme_id, asset_key)): Path<(String, String)>,
) -> Result<Response, HttpError> {
    let theme = state
        .themes
        .get_theme(&theme_id, BuildOptions::default())
        .await?;
    asset_response(&theme, &asset_key)
}

/// Check an asset key against the theme as it stands and return the asset
/// name. Runs before any write so a rejected key leaves the theme alone.
async fn checked_asset_name<'k>(
    state: &AppState,
    theme_id: &str,
    asset_key: &'k str,
) -> Result<&'k str, HttpError> {
    let theme = state
        .themes
        .get_theme(theme_id, BuildOptions::default())
        .await?;
    lookup_asset(&theme, asset_key)?;
    Ok(split_asset_key(asset_key).0)
}

/// Replace the asset named by the key and answer as a GET would.
pub async fn put_asset(
    State(state): State<AppState>,
    Path((theme_id, asset_key)): Path<(String, String)>,
    body: String,
) -> Result<Response, HttpError> {
    let name = checked_asset_name(&state, &theme_id, &asset_key).await?;
    let theme = state.themes.set_asset(&theme_id, name, body).await?;
    asset_response(&theme, &asset_key)
}

pub async fn patch_asset(
    State(state): State<AppState>,
    Path((theme_id, asset_key)): Path<(String, String)>,
    body: String,
) -> Result<Response, HttpError> {
    let name = checked_asset_name(&state, &theme_id, &asset_key).await?;
    let theme = state
        .themes
        .sparse_update_asset(&theme_id, name, body)
        .await?;
    asset_response(&theme, &asset_key)
}

pub async fn delete_asset(
    State(state): State<AppState>,
    Path((theme_id, asset_key)): Path<(String, String)>,
) -> Result<StatusCode, HttpError> {
    let name = checked_asset_name(&state, &theme_id, &asset_key).await?;
    state.themes.delete_asset(&theme_id, name).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn asset_response(theme: &Theme, asset_key: &str) -> Result<Response, HttpError> {
    Ok(match resolve_asset(theme, asset_key)? {
        AssetResponse::Rendered(r) => {
            ([(header::CONTENT_TYPE, r.content_type)], r.body).into_response()
        }
        AssetResponse::Envelope(v) => Json(v).into_response(),
    })
}
