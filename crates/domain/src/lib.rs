pub mod asset;
pub mod buster;
pub mod config;
pub mod setting;
pub mod slot;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown asset type: {0}")]
    UnknownAssetType(String),

    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting { key: String, reason: String },
}
