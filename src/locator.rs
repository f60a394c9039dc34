//! Playlist locator parsing.
//!
//! Accepts the forms a user copies out of a Spotify client:
//!
//! - `https://open.spotify.com/playlist/<id>?si=...`
//! - `https://open.spotify.com/intl-de/playlist/<id>`
//! - `spotify:playlist:<id>`

use crate::{Res, ShuffleError};

/// Extracts the playlist identifier from a URL or URI.
///
/// The identifier is the segment right after `playlist`, with any query string
/// or fragment removed. A locator without such a segment, or with an empty
/// one, is an [`ShuffleError::InvalidLocator`].
pub fn parse_playlist_id(locator: &str) -> Res<String> {
    let trimmed = locator.trim();
    let invalid = || ShuffleError::InvalidLocator(locator.to_string());

    let candidate = if let Some(rest) = trimmed.strip_prefix("spotify:") {
        let mut parts = rest.split(':');
        parts
            .position(|p| p == "playlist")
            .and_then(|_| parts.next())
    } else {
        let mut parts = trimmed.split('/');
        parts
            .position(|p| p == "playlist")
            .and_then(|_| parts.next())
    };

    let id = candidate
        .map(|segment| segment.split(['?', '#']).next().unwrap_or_default())
        .ok_or_else(invalid)?;

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }

    Ok(id.to_string())
}
