use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
    pub error: Option<String>,
}

/// Application credentials read from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

/// One occurrence of a track in a playlist at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    pub track_id: String,
    pub position_hint: usize,
}

impl TrackEntry {
    pub fn new(track_id: impl Into<String>, position_hint: usize) -> Self {
        Self {
            track_id: track_id.into(),
            position_hint,
        }
    }
}

/// Deduplicated, ordered content of a playlist at one point in time.
///
/// No two entries share a `track_id`. Built once by the fetcher and never
/// mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct PlaylistSnapshot {
    entries: Vec<TrackEntry>,
    pages: usize,
    fetched: usize,
    skipped: usize,
}

impl PlaylistSnapshot {
    /// Builds a snapshot from entries in traversal order, keeping only the
    /// first occurrence of each track.
    pub fn from_entries(entries: Vec<TrackEntry>, pages: usize) -> Self {
        let fetched = entries.len();
        let mut seen = HashSet::with_capacity(fetched);
        let mut entries = entries;
        entries.retain(|entry| seen.insert(entry.track_id.clone()));

        Self {
            entries,
            pages,
            fetched,
            skipped: 0,
        }
    }

    /// Records how many unaddressable items the store skipped.
    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    pub fn track_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.track_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of page requests it took to build this snapshot.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Number of entries received before duplicates were dropped.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn duplicates(&self) -> usize {
        self.fetched - self.entries.len()
    }

    /// Number of items the store could not address (local files and such).
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// A permutation of a snapshot's track identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShuffledOrder {
    track_ids: Vec<String>,
}

impl ShuffledOrder {
    pub fn new(track_ids: Vec<String>) -> Self {
        Self { track_ids }
    }

    pub fn track_ids(&self) -> &[String] {
        &self.track_ids
    }

    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.track_ids
    }
}

#[derive(Tabled)]
pub struct PreviewTableRow {
    pub position: usize,
    pub track: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemsResponse {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub is_local: bool,
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemTrack {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUrisRequest {
    pub uris: Vec<String>,
}
