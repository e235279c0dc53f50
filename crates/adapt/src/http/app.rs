// crates/adapt/src/http/app.rs

use crate::http::middleware::request_span;
use crate::http::theme;
use crate::service::ThemeService;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;

pub const API_PREFIX: &str = "/api/v2/themes";

#[derive(Clone)]
pub struct AppState {
    pub themes: Arc<dyn ThemeService>,
}

#[tracing::instrument(skip_all)]
pub fn build_app(themes: Arc<dyn ThemeService>) -> Router {
    let state = AppState { themes };

    let api = Router::new()
        .route("/", get(theme::list_themes))
        .route(
            "/current",
            get(theme::get_current).put(theme::put_current),
        )
        .route("/{theme_key}", get(theme::get_theme))
        .route(
            "/{theme_id}/assets/{asset_key}",
            get(theme::get_asset)
                .put(theme::put_asset)
                .patch(theme::patch_asset)
                .delete(theme::delete_asset),
        );

    Router::new()
        .nest(API_PREFIX, api)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(middleware::from_fn(request_span)))
}
