use std::path::PathBuf;

use rspotify::{ClientError, model::IdError};
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("Invalid Spotify identifier: {0}")]
    InvalidId(#[from] IdError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Entries are never rewritten in place, so a bad file needs manual removal
    #[error("Cached response {path:?} is unreadable ({source}), delete it and rerun")]
    CacheCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Spotify API unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}
