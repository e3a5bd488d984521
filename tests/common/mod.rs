#![allow(dead_code)]

use std::cell::RefCell;

use serde_json::{Value, json};
use sorted_playlists::clients::{
    CatalogApi,
    errors::{Error, Result},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Artist(String),
    Albums {
        artist_id: String,
        album_type: String,
        limit: u32,
    },
    Tracks {
        album_id: String,
        limit: u32,
    },
    Features(String),
    Replace(String, Vec<String>),
    Add(String, Vec<String>),
    Details {
        playlist_id: String,
        name: String,
        description: String,
        public: bool,
    },
}

impl Call {
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Call::Artist(_) | Call::Albums { .. } | Call::Tracks { .. } | Call::Features(_)
        )
    }
}

pub struct FakeTrack {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub tempo: f64,
}

pub struct FakeAlbum {
    pub id: String,
    pub name: String,
    pub tracks: Vec<FakeTrack>,
}

/// In-memory stand-in for the Spotify API that records every call
pub struct FakeCatalog {
    pub artist_name: String,
    pub albums: Vec<FakeAlbum>,
    pub fail_track_listing: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeCatalog {
    pub fn new(artist_name: &str) -> Self {
        FakeCatalog {
            artist_name: artist_name.to_string(),
            albums: Vec::new(),
            fail_track_listing: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn album(mut self, id: &str, name: &str, tracks: &[(&str, &str, u64, f64)]) -> Self {
        self.albums.push(FakeAlbum {
            id: id.to_string(),
            name: name.to_string(),
            tracks: tracks
                .iter()
                .map(|&(id, name, duration_ms, tempo)| FakeTrack {
                    id: id.to_string(),
                    name: name.to_string(),
                    duration_ms,
                    tempo,
                })
                .collect(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn read_calls(&self) -> usize {
        self.calls.borrow().iter().filter(|c| c.is_read()).count()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !c.is_read())
            .cloned()
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl CatalogApi for FakeCatalog {
    async fn get_artist(&self, artist_id: &str) -> Result<Value> {
        self.record(Call::Artist(artist_id.to_string()));
        Ok(json!({ "id": artist_id, "name": self.artist_name, "genres": [] }))
    }

    async fn get_artist_albums(
        &self,
        artist_id: &str,
        album_type: &str,
        limit: u32,
    ) -> Result<Value> {
        self.record(Call::Albums {
            artist_id: artist_id.to_string(),
            album_type: album_type.to_string(),
            limit,
        });
        let items: Vec<Value> = self
            .albums
            .iter()
            .map(|a| json!({ "id": a.id, "name": a.name, "album_type": album_type }))
            .collect();
        Ok(json!({ "items": items, "limit": limit, "offset": 0, "total": items.len() }))
    }

    async fn get_album_tracks(&self, album_id: &str, limit: u32) -> Result<Value> {
        self.record(Call::Tracks {
            album_id: album_id.to_string(),
            limit,
        });
        if self.fail_track_listing {
            return Err(Error::UnexpectedResponse("429 Too Many Requests".into()));
        }
        let album = self
            .albums
            .iter()
            .find(|a| a.id == album_id)
            .ok_or_else(|| Error::UnexpectedResponse(format!("404 album {album_id}")))?;
        let items: Vec<Value> = album
            .tracks
            .iter()
            .map(|t| json!({ "id": t.id, "name": t.name, "duration_ms": t.duration_ms }))
            .collect();
        Ok(json!({ "items": items, "limit": limit, "offset": 0 }))
    }

    async fn get_audio_features(&self, track_id: &str) -> Result<Value> {
        self.record(Call::Features(track_id.to_string()));
        let tempo = self
            .albums
            .iter()
            .flat_map(|a| &a.tracks)
            .find(|t| t.id == track_id)
            .map_or(0.0, |t| t.tempo);
        Ok(json!([{ "id": track_id, "tempo": tempo, "energy": 0.5 }]))
    }

    async fn replace_playlist_items(&self, playlist_id: &str, items: &[String]) -> Result<()> {
        self.record(Call::Replace(playlist_id.to_string(), items.to_vec()));
        Ok(())
    }

    async fn add_playlist_items(&self, playlist_id: &str, items: &[String]) -> Result<()> {
        self.record(Call::Add(playlist_id.to_string(), items.to_vec()));
        Ok(())
    }

    async fn change_playlist_details(
        &self,
        playlist_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<()> {
        self.record(Call::Details {
            playlist_id: playlist_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            public,
        });
        Ok(())
    }
}

/// Two albums, one blacklisted by name; the surviving album has three tracks,
/// one of them blacklisted.
pub fn scenario_catalog() -> FakeCatalog {
    FakeCatalog::new("The Band")
        .album(
            "live01",
            "Live at the Apollo",
            &[("l1", "Opener", 200_000, 100.0)],
        )
        .album(
            "studio1",
            "First Record",
            &[
                ("t1", "Morning", 185_000, 90.0),
                ("t2", "Morning (Demo)", 170_000, 95.0),
                ("t3", "Evening", 240_000, 130.0),
            ],
        )
}
