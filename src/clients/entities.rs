use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    pub name: String,
    /// Position in the unfiltered album listing
    pub album_number: usize,
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    /// Position in the unfiltered track listing of its album
    pub track_number: usize,
    pub album: Album,
    /// Raw audio features response, kept as returned by the API
    pub features: Value,
}

impl Track {
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.id)
    }

    // The endpoint may answer with a single record or a one-element list
    pub fn feature(&self, feature: AudioFeature) -> Option<f64> {
        let record = match &self.features {
            Value::Array(list) => list.first()?,
            other => other,
        };
        record.get(feature.as_str())?.as_f64()
    }
}

/// Audio analysis values usable as sort keys and filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFeature {
    Tempo,
    Danceability,
    Energy,
    Valence,
    Loudness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Speechiness,
}

impl AudioFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFeature::Tempo => "tempo",
            AudioFeature::Danceability => "danceability",
            AudioFeature::Energy => "energy",
            AudioFeature::Valence => "valence",
            AudioFeature::Loudness => "loudness",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Liveness => "liveness",
            AudioFeature::Speechiness => "speechiness",
        }
    }
}

// Wire shapes read back out of cached responses. Only the fields the pipeline
// needs are declared; everything else stays in the raw JSON.

#[derive(Deserialize, Debug)]
pub(crate) struct ArtistRecord {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Page<T> {
    pub items: Vec<T>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AlbumRecord {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct TrackRecord {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
}

/// Strips a `spotify:<kind>:` prefix if present
pub(crate) fn bare_id(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}
