use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::{Blacklist, FetchOptions};
use crate::clients::errors::{Error, Result};
use crate::playlists::PlaylistDefinition;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV_VAR: &str = "SORTED_PLAYLISTS_CONFIG";

/// Static input for one refresh run, read from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub artist_id: String,
    #[serde(default)]
    pub blacklist: Vec<String>,
    pub playlists: Vec<PlaylistDefinition>,
    /// Where cached API responses live; defaults under the user cache dir
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
    #[serde(default = "default_album_type")]
    pub album_type: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_album_type() -> String {
    "album".to_string()
}

fn default_page_limit() -> u32 {
    50
}

fn default_public() -> bool {
    true
}

impl Settings {
    pub fn from_json(contents: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::ConfigurationError(format!("Cannot read settings file {path:?}: {e}"))
        })?;
        debug!("Loaded settings from {path:?}");
        Self::from_json(&contents)
    }

    // Explicit path, then the environment, then the platform config dir
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("sorted-playlists")
                    .join("config.json")
            })
    }

    pub fn validate(&self) -> Result<()> {
        if self.artist_id.trim().is_empty() {
            return Err(Error::ConfigurationError("artist_id must not be empty".into()));
        }
        if self.playlists.is_empty() {
            return Err(Error::ConfigurationError(
                "at least one playlist definition is required".into(),
            ));
        }
        if self.page_limit == 0 {
            return Err(Error::ConfigurationError("page_limit must be positive".into()));
        }
        let mut labels = HashSet::new();
        for playlist in &self.playlists {
            if !labels.insert(playlist.label.as_str()) {
                return Err(Error::ConfigurationError(format!(
                    "duplicate playlist label {:?}",
                    playlist.label
                )));
            }
        }
        Ok(())
    }

    pub fn blacklist(&self) -> Blacklist {
        Blacklist::new(&self.blacklist)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            album_type: self.album_type.clone(),
            page_limit: self.page_limit,
        }
    }
}
