//! # CLI Module
//!
//! Command implementations behind the binary. Each command returns a
//! [`Res`](crate::Res); turning errors into a diagnostic and an exit code is
//! left to `main`.
//!
//! - [`shuffle`] - Shuffle a playlist given its URL or URI
//! - [`auth`] - Run the Spotify OAuth flow and store the token
//!
//! ```bash
//! sporlshuffle auth
//! sporlshuffle https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M
//! sporlshuffle spotify:playlist:37i9dQZF1DXcBWIGoYBM5M --strategy clear-append
//! sporlshuffle spotify:playlist:37i9dQZF1DXcBWIGoYBM5M --dry-run
//! ```

mod auth;
mod shuffle;

pub use auth::auth;
pub use shuffle::shuffle;
