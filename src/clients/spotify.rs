use std::path::PathBuf;

use log::debug;
use serde_json::Value;

use crate::clients::{
    CatalogApi,
    errors::{Error, Result},
};
use rspotify::{
    AuthCodeSpotify, Config, Credentials, OAuth,
    model::{AlbumId, AlbumType, ArtistId, PlayableId, PlaylistId, TrackId},
    prelude::*,
    scopes,
};

pub struct SpotifyClient {
    pub spotify: AuthCodeSpotify,
}

impl SpotifyClient {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Authorize the Spotify client via CLI prompt and OAuth flow
    // This function requires the `cli` feature enabled.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self.spotify.get_authorize_url(false)?;
        // Reuses the cached token when it is still valid
        self.spotify.prompt_for_token(&url).await?;
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        Ok(())
    }

    // Create a SpotifyClient from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let creds = Credentials::from_env()
        .ok_or_else(|| Error::ConfigurationError("Missing Spotify credentials in environment variables. Check README.md for details.".into()))?;
        let oauth = OAuth::from_env(scopes!("playlist-modify-public"))
        .ok_or_else(|| Error::ConfigurationError("Missing Spotify OAuth configuration in environment variables. Check README.md for details.".into()))?;

        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join("sorted-playlists")
            .join(".spotify_token_cache.json");

        let spotify = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: true,
                token_refreshing: true,
                cache_path,
                ..Default::default()
            },
        );

        Ok(Self { spotify })
    }
}

fn parse_album_type(album_type: &str) -> Result<AlbumType> {
    match album_type {
        "album" => Ok(AlbumType::Album),
        "single" => Ok(AlbumType::Single),
        "appears_on" => Ok(AlbumType::AppearsOn),
        "compilation" => Ok(AlbumType::Compilation),
        other => Err(Error::ConfigurationError(format!(
            "Unknown album type {other:?}, expected album, single, appears_on or compilation"
        ))),
    }
}

fn track_ids(items: &[String]) -> Result<Vec<PlayableId<'_>>> {
    items
        .iter()
        .map(|uri| Ok(PlayableId::Track(TrackId::from_id_or_uri(uri)?)))
        .collect()
}

impl CatalogApi for SpotifyClient {
    async fn get_artist(&self, artist_id: &str) -> Result<Value> {
        let id = ArtistId::from_id_or_uri(artist_id)?;
        let artist = self.spotify.artist(id).await?;
        Ok(serde_json::to_value(artist)?)
    }

    async fn get_artist_albums(
        &self,
        artist_id: &str,
        album_type: &str,
        limit: u32,
    ) -> Result<Value> {
        let id = ArtistId::from_id_or_uri(artist_id)?;
        let include = [parse_album_type(album_type)?];
        let page = self
            .spotify
            .artist_albums_manual(id, include, None, Some(limit), Some(0))
            .await?;
        Ok(serde_json::to_value(page)?)
    }

    async fn get_album_tracks(&self, album_id: &str, limit: u32) -> Result<Value> {
        let id = AlbumId::from_id_or_uri(album_id)?;
        let page = self
            .spotify
            .album_track_manual(id, None, Some(limit), Some(0))
            .await?;
        Ok(serde_json::to_value(page)?)
    }

    async fn get_audio_features(&self, track_id: &str) -> Result<Value> {
        let id = TrackId::from_id_or_uri(track_id)?;
        let features = self.spotify.track_features(id).await?;
        Ok(serde_json::to_value(features)?)
    }

    async fn replace_playlist_items(&self, playlist_id: &str, items: &[String]) -> Result<()> {
        let id = PlaylistId::from_id_or_uri(playlist_id)?;
        self.spotify
            .playlist_replace_items(id, track_ids(items)?)
            .await?;
        Ok(())
    }

    async fn add_playlist_items(&self, playlist_id: &str, items: &[String]) -> Result<()> {
        let id = PlaylistId::from_id_or_uri(playlist_id)?;
        let result = self
            .spotify
            .playlist_add_items(id, track_ids(items)?, None)
            .await?;
        debug!("Added {} items, snapshot {}", items.len(), result.snapshot_id);
        Ok(())
    }

    async fn change_playlist_details(
        &self,
        playlist_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<()> {
        let id = PlaylistId::from_id_or_uri(playlist_id)?;
        self.spotify
            .playlist_change_detail(id, Some(name), Some(public), Some(description), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn album_types_parse() {
        assert_eq!(parse_album_type("album").unwrap(), AlbumType::Album);
        assert_eq!(parse_album_type("appears_on").unwrap(), AlbumType::AppearsOn);
        assert!(matches!(
            parse_album_type("ep"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn track_uris_and_ids_both_parse() {
        let items = vec![
            "spotify:track:4iV5W9uYEdYUVa79Axb7Rh".to_string(),
            "1301WleyT98MSxVHPZCA6M".to_string(),
        ];
        let ids = track_ids(&items).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(track_ids(&["spotify:album:4iV5W9uYEdYUVa79Axb7Rh".to_string()]).is_err());
    }
}
