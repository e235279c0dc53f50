pub mod http;
pub mod loader;
pub mod service;

use ::http::StatusCode;
use serve::Error as ServeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Serve(#[from] ServeError),

    #[error("theme `{0}` not found")]
    ThemeNotFound(String),

    #[error("no current theme is set")]
    NoCurrentTheme,

    #[error("asset `{0}` does not hold JSON data")]
    NotJsonAsset(String),

    #[error("asset `{0}` is derived from theme variables and cannot be written")]
    DerivedAsset(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("failed to load theme from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    pub fn to_status(&self) -> StatusCode {
        match self {
            Error::Serve(e) => e.to_status(),
            Error::ThemeNotFound(_) | Error::NoCurrentTheme => StatusCode::NOT_FOUND,
            Error::NotJsonAsset(_) | Error::DerivedAsset(_) | Error::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[inline]
    pub fn load(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Error::Load {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
