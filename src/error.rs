//! Error types for the playlist shuffler.
//!
//! Two layers exist: [`StoreError`] describes a single failed call against a
//! [`PlaylistStore`](crate::store::PlaylistStore), while [`ShuffleError`]
//! describes why a whole shuffle run stopped. Every `ShuffleError` is fatal to
//! the run; nothing is retried above the store.

use std::{fmt, ops::Range};

use thiserror::Error;

/// Failure of one call against a playlist store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("batch of {size} items exceeds the store limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("{0} is not supported by this store")]
    Unsupported(&'static str),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Maps a non-success HTTP status and its body to a store error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message.into()),
            _ => Self::Api {
                status,
                message: message.into(),
            },
        }
    }
}

/// Rewrite stage a batch belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    Removal,
    Append,
    Replace,
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStage::Removal => write!(f, "removal"),
            BatchStage::Append => write!(f, "append"),
            BatchStage::Replace => write!(f, "replace"),
        }
    }
}

/// Reason a shuffle run stopped.
#[derive(Error, Debug)]
pub enum ShuffleError {
    /// The locator has no recognizable playlist identifier. No store call was made.
    #[error("invalid playlist locator '{0}': expected a playlist URL or spotify:playlist:<id> URI")]
    InvalidLocator(String),

    /// Credential exchange or token refresh failed. No playlist data was touched.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// A page request failed. The playlist has not been modified.
    #[error("failed to fetch playlist {playlist_id}, nothing was modified: {source}")]
    FetchFailure {
        playlist_id: String,
        #[source]
        source: StoreError,
    },

    /// A write batch failed. The playlist may be partially rewritten.
    #[error(
        "{stage} batch #{batch} (items {range:?}) failed; the playlist may be partially rewritten: {source}"
    )]
    BatchFailure {
        stage: BatchStage,
        batch: usize,
        range: Range<usize>,
        #[source]
        source: StoreError,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ShuffleError {
    /// True when the remote playlist may have been left half written.
    pub fn is_partial_write(&self) -> bool {
        matches!(self, ShuffleError::BatchFailure { .. })
    }
}
