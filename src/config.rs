//! Configuration management for the playlist shuffler.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in `<data_local_dir>/sporlshuffle/`
//! 3. Built-in defaults for the Spotify endpoints and scope

use std::{env, path::PathBuf};

use crate::{Res, ShuffleError, types::Credentials};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private";

/// Directory holding `.env`, the token cache and the config template.
///
/// - Linux: `~/.local/share/sporlshuffle`
/// - macOS: `~/Library/Application Support/sporlshuffle`
/// - Windows: `%LOCALAPPDATA%/sporlshuffle`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlshuffle");
    path
}

/// Loads `<data_dir>/.env` into the process environment.
///
/// A missing file is fine: everything can come from the environment.
/// Variables that are already set are not overwritten.
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if async_fs::metadata(&path).await.is_err() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| ShuffleError::Config(format!("cannot load {}: {}", path.display(), e)))
}

/// Reads the application credentials.
///
/// `SPOTIFY_CLIENT_ID` and `SPOTIFY_REDIRECT_URI` are required.
/// `SPOTIFY_CLIENT_SECRET` is optional; PKCE-only apps leave it unset.
pub fn credentials() -> Res<Credentials> {
    Ok(Credentials {
        client_id: required("SPOTIFY_CLIENT_ID")?,
        client_secret: optional("SPOTIFY_CLIENT_SECRET"),
        redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
    })
}

/// Spotify Web API base URL, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
}

/// Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
}

/// Space separated OAuth scopes requested during authorization.
pub fn spotify_scope() -> String {
    optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string())
}

fn required(name: &str) -> Res<String> {
    optional(name).ok_or_else(|| ShuffleError::AuthFailure(format!("{} must be set", name)))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
