//! # Playlist Store
//!
//! The capability the shuffle pipeline runs against. A store exposes a
//! playlist as pages of track entries plus a few batch-limited write calls.
//! The pipeline never talks HTTP itself; it only sees this trait, so the
//! Spotify client ([`crate::spotify::SpotifyStore`]) and the in-memory
//! [`MemoryStore`] are interchangeable.
//!
//! Authentication, transport retries and rate limiting belong to the
//! implementation, not to the caller.

mod memory;

use async_trait::async_trait;

pub use memory::{MemoryStore, StoreCall, StoreOp};

use crate::{StoreError, types::TrackEntry};

/// Largest number of track identifiers a single write call accepts.
pub const MAX_BATCH_SIZE: usize = 100;

/// One page of playlist items.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub entries: Vec<TrackEntry>,
    /// Opaque continuation token; `None` on the last page.
    pub next_page_token: Option<String>,
    /// Items on this page the store cannot address by track id (local files,
    /// unavailable tracks). They are left where they are by removal batches
    /// but would be lost by a full replace.
    pub skipped: usize,
}

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Returns the page addressed by `page_token`, or the first page when `None`.
    async fn list_page(&self, playlist_id: &str, page_token: Option<&str>)
    -> Result<Page, StoreError>;

    /// Removes every occurrence of each given track. At most [`MAX_BATCH_SIZE`] ids.
    async fn remove_all_occurrences(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), StoreError>;

    /// Appends the given tracks, in order. At most [`MAX_BATCH_SIZE`] ids.
    async fn append_items(&self, playlist_id: &str, track_ids: &[String])
    -> Result<(), StoreError>;

    /// Atomically sets the full content of the playlist.
    async fn replace_items(
        &self,
        _playlist_id: &str,
        _track_ids: &[String],
    ) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("replace_items"))
    }

    fn supports_replace(&self) -> bool {
        false
    }

    /// Largest order `replace_items` accepts in one call; `None` means unbounded.
    fn replace_limit(&self) -> Option<usize> {
        None
    }

    /// Store name for log output.
    fn name(&self) -> &str;
}

/// Rejects a write batch larger than [`MAX_BATCH_SIZE`].
pub fn check_batch(track_ids: &[String]) -> Result<(), StoreError> {
    check_batch_limit(track_ids, MAX_BATCH_SIZE)
}

pub(crate) fn check_batch_limit(track_ids: &[String], limit: usize) -> Result<(), StoreError> {
    if track_ids.len() > limit {
        return Err(StoreError::BatchTooLarge {
            size: track_ids.len(),
            limit,
        });
    }
    Ok(())
}
