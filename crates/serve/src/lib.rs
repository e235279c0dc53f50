pub mod asset;
pub mod builder;
pub mod factory;
pub mod neon;
pub mod render;
pub mod resolver;
pub mod theme;
pub mod variables;

use domain::asset::AssetType;
use http::StatusCode;
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("asset `{0}` not found")]
    NotFound(String),

    #[error("invalid extension '.{extension}' for asset '{asset}'")]
    InvalidExtension { extension: String, asset: String },

    #[error("asset `{asset}` of type {found} cannot fill a slot declared as {declared}")]
    SlotMismatch {
        asset: String,
        found: AssetType,
        declared: AssetType,
    },

    #[error("template error: {0}")]
    Template(String),

    #[error("NEON error: {0}")]
    Neon(#[from] neon::NeonError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FromUTF8 error: {0}")]
    FromUTF8(#[from] FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<minijinja::Error> for Error {
    fn from(e: minijinja::Error) -> Self {
        Error::Template(e.to_string())
    }
}

impl Error {
    pub fn to_status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidExtension { .. } | Error::SlotMismatch { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
