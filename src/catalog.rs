use std::collections::HashMap;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::{
    CallKey, CatalogApi, ResponseCache,
    entities::{Album, AlbumRecord, ArtistRecord, Page, Track, TrackRecord, bare_id},
    errors::{Error, Result},
};

/// Case-insensitive substring blacklist for album and track names
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    words: Vec<String>,
}

impl Blacklist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Blacklist { words }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.words.iter().any(|word| name.contains(word.as_str()))
    }
}

/// Insertion-ordered table keyed by identifier.
///
/// Inserting an existing key replaces the value but keeps its original slot.
#[derive(Debug, Clone)]
pub struct Table<T> {
    index: HashMap<String, usize>,
    entries: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the replaced value when `id` was already present
    pub fn insert(&mut self, id: String, value: T) -> Option<T> {
        match self.index.get(&id) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot], value)),
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(value);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Everything fetched for one artist
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub artist_name: String,
    pub albums: Table<Album>,
    pub tracks: Table<Track>,
}

/// Listing parameters for the remote reads
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub album_type: String,
    pub page_limit: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            album_type: "album".to_string(),
            page_limit: 50,
        }
    }
}

/// Walks artist -> albums -> tracks -> audio features, reading through the cache
pub struct CatalogFetcher<'a, C> {
    api: &'a C,
    cache: &'a ResponseCache,
    blacklist: &'a Blacklist,
    options: FetchOptions,
}

impl<'a, C: CatalogApi> CatalogFetcher<'a, C> {
    pub fn new(
        api: &'a C,
        cache: &'a ResponseCache,
        blacklist: &'a Blacklist,
        options: FetchOptions,
    ) -> Self {
        CatalogFetcher {
            api,
            cache,
            blacklist,
            options,
        }
    }

    pub async fn get_artist(&self, artist_id: &str) -> Result<Value> {
        let key = CallKey::new(format!("spotify:artist:{artist_id}"));
        self.cache
            .cached(&key, || self.api.get_artist(artist_id))
            .await
    }

    pub async fn get_artist_albums(&self, artist_id: &str) -> Result<Value> {
        let FetchOptions {
            album_type,
            page_limit,
        } = &self.options;
        let key = CallKey::new(format!("spotify:artist:{artist_id}"))
            .kwarg("album_type", album_type.as_str())
            .kwarg("limit", *page_limit);
        self.cache
            .cached(&key, || {
                self.api
                    .get_artist_albums(artist_id, album_type, *page_limit)
            })
            .await
    }

    pub async fn get_album_tracks(&self, album_id: &str) -> Result<Value> {
        let limit = self.options.page_limit;
        let key = CallKey::new(format!("spotify:album:{album_id}")).kwarg("limit", limit);
        self.cache
            .cached(&key, || self.api.get_album_tracks(album_id, limit))
            .await
    }

    pub async fn get_track_features(&self, track_id: &str) -> Result<Value> {
        let key = CallKey::new(format!("spotify:track:{track_id}"));
        self.cache
            .cached(&key, || self.api.get_audio_features(track_id))
            .await
    }

    pub async fn fetch(&self, artist_id: &str) -> Result<Catalog> {
        let artist: ArtistRecord = decode(self.get_artist(artist_id).await?, "artist")?;
        info!("==> Found artist: {}", artist.name);

        let listing: Page<AlbumRecord> =
            decode(self.get_artist_albums(artist_id).await?, "album listing")?;
        info!("==> Found {} albums:", listing.items.len());

        let mut albums = Table::new();
        for (album_number, record) in listing.items.into_iter().enumerate() {
            if self.blacklist.matches(&record.name) {
                debug!("Skipping blacklisted album {}", record.name);
                continue;
            }
            let Some(id) = record.id.as_deref().map(bare_id) else {
                warn!("Album {} has no identifier, skipping", record.name);
                continue;
            };
            info!("\t{}", record.name);
            let album = Album {
                id: id.to_string(),
                name: record.name,
                album_number,
            };
            albums.insert(album.id.clone(), album);
        }

        let mut tracks = Table::new();
        for album in &albums {
            self.fetch_album_tracks(album, &mut tracks).await?;
        }

        Ok(Catalog {
            artist_name: artist.name,
            albums,
            tracks,
        })
    }

    async fn fetch_album_tracks(&self, album: &Album, tracks: &mut Table<Track>) -> Result<()> {
        let listing: Page<TrackRecord> =
            decode(self.get_album_tracks(&album.id).await?, "track listing")?;
        info!(
            "==> Found {} tracks on album <{}>:",
            listing.items.len(),
            album.name
        );

        for (track_number, record) in listing.items.into_iter().enumerate() {
            if self.blacklist.matches(&record.name) {
                debug!("Skipping blacklisted track {}", record.name);
                continue;
            }
            // Local files carry no identifier and cannot be added to playlists
            let Some(id) = record.id.as_deref().map(bare_id) else {
                warn!("Track {} has no identifier, skipping", record.name);
                continue;
            };
            info!("\t{} - {}", album.name, record.name);

            let track = Track {
                id: id.to_string(),
                name: record.name,
                duration_ms: record.duration_ms,
                track_number,
                album: album.clone(),
                features: self.get_track_features(id).await?,
            };
            if let Some(previous) = tracks.insert(track.id.clone(), track) {
                warn!(
                    "Track {} appears on several albums, keeping the one from <{}> (was <{}>)",
                    previous.id, album.name, previous.album.name
                );
            }
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::UnexpectedResponse(format!("Malformed {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blacklist_is_case_insensitive_substring() {
        let blacklist = Blacklist::new(["Live", "remix"]);
        assert!(blacklist.matches("Alive (LIVE at Wembley)"));
        assert!(blacklist.matches("Song - Club Remix"));
        assert!(blacklist.matches("deliver"));
        assert!(!blacklist.matches("Studio Version"));
    }

    #[test]
    fn empty_blacklist_matches_nothing() {
        assert!(!Blacklist::default().matches("anything"));
        assert!(!Blacklist::new([""]).matches("anything"));
    }

    #[test]
    fn table_keeps_first_slot_and_last_value() {
        let mut table = Table::new();
        assert!(table.insert("a".into(), 1).is_none());
        assert!(table.insert("b".into(), 2).is_none());
        assert_eq!(table.insert("a".into(), 3), Some(1));

        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().copied().collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(table.get("a"), Some(&3));
        assert_eq!(table.get("missing"), None);
    }
}
