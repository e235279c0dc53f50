use adapt::Error as AdaptError;
use serve::Error as ServeError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Setting(#[from] domain::Error),

    #[error("adapt error: {0}")]
    AdaptError(#[from] AdaptError),

    #[error("serve error: {0}")]
    ServeError(#[from] ServeError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("themes directory {0} does not exist")]
    MissingThemesDir(String),
}
