use serde_json::Value;

use crate::clients::errors::Result;

/// Data entities for albums, tracks and audio features
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// On-disk cache of raw API responses
pub mod response_cache;
/// Spotify API client
pub mod spotify;

pub use response_cache::{CallKey, ResponseCache};
pub use spotify::SpotifyClient;

/// Operations the pipeline needs from the remote catalog service.
///
/// Reads hand back the raw JSON body so it can be cached verbatim. Playlist
/// items are track URIs (`spotify:track:<id>`).
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    async fn get_artist(&self, artist_id: &str) -> Result<Value>;

    async fn get_artist_albums(
        &self,
        artist_id: &str,
        album_type: &str,
        limit: u32,
    ) -> Result<Value>;

    async fn get_album_tracks(&self, album_id: &str, limit: u32) -> Result<Value>;

    async fn get_audio_features(&self, track_id: &str) -> Result<Value>;

    async fn replace_playlist_items(&self, playlist_id: &str, items: &[String]) -> Result<()>;

    async fn add_playlist_items(&self, playlist_id: &str, items: &[String]) -> Result<()>;

    async fn change_playlist_details(
        &self,
        playlist_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<()>;
}
