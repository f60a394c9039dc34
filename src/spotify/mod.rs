//! # Spotify Integration Module
//!
//! The Spotify side of the shuffler: the OAuth flow that produces a session
//! token and the [`SpotifyStore`] that exposes a playlist through the
//! [`PlaylistStore`](crate::store::PlaylistStore) capability.
//!
//! ```text
//! Pipeline (fetch → shuffle → rewrite)
//!          ↓
//! PlaylistStore trait
//!          ↓
//! SpotifyStore ── TokenManager ── auth (OAuth 2.0 PKCE)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Endpoints
//!
//! - `GET /playlists/{id}/tracks` - one page of items, `next` URL as page token
//! - `DELETE /playlists/{id}/tracks` - remove every occurrence of up to 100 tracks
//! - `POST /playlists/{id}/tracks` - append up to 100 tracks
//! - `PUT /playlists/{id}/tracks` - replace the content with up to 100 tracks
//! - `POST /api/token` - code exchange and token refresh
//!
//! ## Error Handling
//!
//! - 502 Bad Gateway is retried after 10 seconds
//! - 429 Too Many Requests honours `Retry-After` up to 120 seconds
//! - 401/403 become [`StoreError::Unauthorized`](crate::StoreError::Unauthorized)
//! - Anything else non-successful becomes [`StoreError::Api`](crate::StoreError::Api)
//!
//! Retries stop after three attempts; the pipeline above never retries.
//!
//! ## Session Lifecycle
//!
//! The session token is owned by a [`TokenManager`](crate::management::TokenManager)
//! handed to [`SpotifyStore::new`]. The binary creates it (loading the cached
//! token or running [`auth::authorize`]) and drops it on exit.

pub mod auth;
mod playlist;

pub use playlist::SpotifyStore;
