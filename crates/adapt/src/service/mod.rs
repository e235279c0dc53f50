// crates/adapt/src/service/mod.rs

//! Theme storage port used by the HTTP layer.

mod memory;

pub use memory::MemoryThemeService;

use crate::Error;
use async_trait::async_trait;
use serve::builder::BuildOptions;
use serve::theme::Theme;

/// Theme key that names whichever theme is currently active.
pub const CURRENT: &str = "current";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThemeService: Send + Sync {
    /// Fetch a theme by ID, or the active one for [`CURRENT`].
    async fn get_theme(&self, key: &str, options: BuildOptions) -> Result<Theme, Error>;

    async fn get_themes(&self) -> Result<Vec<Theme>, Error>;

    async fn current_theme(&self) -> Result<Theme, Error>;

    async fn set_current_theme(&self, theme_id: &str) -> Result<Theme, Error>;

    /// Replace an asset's source, keeping its type.
    async fn set_asset(&self, theme_id: &str, asset_name: &str, body: String)
        -> Result<Theme, Error>;

    /// Merge a JSON patch into a JSON or NEON asset.
    async fn sparse_update_asset(
        &self,
        theme_id: &str,
        asset_name: &str,
        body: String,
    ) -> Result<Theme, Error>;

    async fn delete_asset(&self, theme_id: &str, asset_name: &str) -> Result<(), Error>;
}
