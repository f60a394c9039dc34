//! # API Module
//!
//! HTTP handlers for the short-lived local server that receives the Spotify
//! OAuth redirect.
//!
//! - [`callback`] - Exchanges the authorization code for a token (PKCE)
//! - [`health`] - Reports status and version
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use sporlshuffle::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
