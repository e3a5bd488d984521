use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::clients::entities::{AudioFeature, Track};

/// Divisor for the hour component of a playlist runtime.
///
/// Minutes and seconds use 60 as usual. Published descriptions have always
/// been rendered with this value, so `3720 s` reads `1:01:00`.
pub const RUNTIME_HOUR_DIVISOR: u64 = 3660;

/// One remote playlist and how to fill it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistDefinition {
    /// Ordering name used in the generated title and description
    pub label: String,
    pub playlist_id: String,
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub filter: TrackFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub by: SortField,
    #[serde(default)]
    pub descending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Album position, then track position
    Album,
    Name,
    Duration,
    #[serde(untagged)]
    Feature(AudioFeature),
}

impl SortKey {
    // Tracks lacking the feature go last in either direction
    fn compare(&self, a: &Track, b: &Track) -> Ordering {
        let ordering = match self.by {
            SortField::Album => (a.album.album_number, a.track_number)
                .cmp(&(b.album.album_number, b.track_number)),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Duration => a.duration_ms.cmp(&b.duration_ms),
            SortField::Feature(feature) => {
                return match (a.feature(feature), b.feature(feature)) {
                    (Some(x), Some(y)) if self.descending => y.total_cmp(&x),
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
            }
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Which tracks a playlist takes. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackFilter {
    #[default]
    All,
    Feature {
        feature: AudioFeature,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Duration {
        #[serde(default)]
        min_secs: Option<u64>,
        #[serde(default)]
        max_secs: Option<u64>,
    },
    Album {
        name_contains: String,
    },
}

impl TrackFilter {
    pub fn accepts(&self, track: &Track) -> bool {
        match self {
            TrackFilter::All => true,
            TrackFilter::Feature { feature, min, max } => match track.feature(*feature) {
                Some(value) => {
                    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
                }
                None => false,
            },
            TrackFilter::Duration { min_secs, max_secs } => {
                let secs = track.duration_ms / 1000;
                min_secs.is_none_or(|min| secs >= min) && max_secs.is_none_or(|max| secs <= max)
            }
            TrackFilter::Album { name_contains } => track
                .album
                .name
                .to_lowercase()
                .contains(&name_contains.to_lowercase()),
        }
    }
}

/// A definition applied to a catalog: ordered tracks plus derived values
#[derive(Debug, Clone)]
pub struct PlaylistView<'a> {
    pub label: String,
    pub playlist_id: String,
    pub tracks: Vec<&'a Track>,
    pub total_duration_ms: u64,
    /// Track URIs in final order
    pub items: Vec<String>,
    /// Human readable lines, one per track
    pub listing: Vec<String>,
}

impl PlaylistView<'_> {
    pub fn runtime(&self) -> String {
        format_runtime(self.total_duration_ms)
    }

    pub fn playlist_name(&self, artist_name: &str) -> String {
        format!("{artist_name} {} *auto-generated*", self.label)
    }

    pub fn description(&self, artist_name: &str, album_count: usize, updated: NaiveDate) -> String {
        format!(
            "All album tracks by {artist_name}, {label}. {album_count} albums, {tracks} tracks, {runtime} hours runtime. Updated {date}.",
            label = self.label,
            tracks = self.tracks.len(),
            runtime = self.runtime(),
            date = updated.format("%Y-%m-%d"),
        )
    }
}

/// Filters and orders the catalog's tracks for one definition. Pure.
pub fn assemble<'a>(catalog: &'a Catalog, definition: &PlaylistDefinition) -> PlaylistView<'a> {
    let mut tracks: Vec<&Track> = catalog
        .tracks
        .iter()
        .filter(|track| definition.filter.accepts(track))
        .collect();
    if let Some(key) = &definition.sort {
        // stable: equal keys keep table order
        tracks.sort_by(|a, b| key.compare(a, b));
    }

    let total_duration_ms = tracks.iter().map(|t| t.duration_ms).sum();
    let items = tracks.iter().map(|t| t.uri()).collect();
    let listing = tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            format!(
                "  {}. {} ~ {} mins",
                index + 1,
                track.name,
                format_track_length(track.duration_ms)
            )
        })
        .collect();

    PlaylistView {
        label: definition.label.clone(),
        playlist_id: definition.playlist_id.clone(),
        tracks,
        total_duration_ms,
        items,
        listing,
    }
}

fn rounded_secs(duration_ms: u64) -> u64 {
    (duration_ms + 500) / 1000
}

/// `M:SS`
pub fn format_track_length(duration_ms: u64) -> String {
    let secs = rounded_secs(duration_ms);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `H:MM:SS`, see [`RUNTIME_HOUR_DIVISOR`]
pub fn format_runtime(total_ms: u64) -> String {
    let total = rounded_secs(total_ms);
    let hours = total / RUNTIME_HOUR_DIVISOR;
    let rem = total % RUNTIME_HOUR_DIVISOR;
    format!("{hours}:{:02}:{:02}", rem / 60, rem % 60)
}
