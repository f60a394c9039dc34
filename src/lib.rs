//! Spotify Playlist Shuffler Library
//!
//! Reorders the tracks of a remote playlist into a uniformly random
//! permutation. The core is a three step pipeline that treats a paginated,
//! batch-limited remote collection as one sequence:
//!
//! 1. **Fetch** every page, collapsing duplicate tracks in first-seen order
//! 2. **Shuffle** the track identifiers (Fisher-Yates)
//! 3. **Rewrite** the playlist in batches of at most [`store::MAX_BATCH_SIZE`]
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line command implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `error` - Store and run level error types
//! - `locator` - Playlist URL / URI parsing
//! - `management` - Fetcher, shuffler, rewriter and token management
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and store implementation
//! - `store` - The playlist store capability and an in-memory store
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers
//!
//! # Example
//!
//! ```
//! use sporlshuffle::{management, store::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> sporlshuffle::Res<()> {
//!     let store = MemoryStore::with_tracks(["a", "b", "c"]);
//!     let report = management::shuffle_playlist(&store, "pl", Default::default()).await?;
//!     println!("{} tracks shuffled", report.distinct);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod locator;
pub mod management;
pub mod server;
pub mod spotify;
pub mod store;
pub mod types;
pub mod utils;

pub use error::{BatchStage, ShuffleError, StoreError};

/// Result type used by every run-level operation.
///
/// # Example
///
/// ```
/// use sporlshuffle::Res;
///
/// fn playlist_id() -> Res<String> {
///     Ok("37i9dQZF1DXcBWIGoYBM5M".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, ShuffleError>;

/// Prints an informational message with a blue bullet point.
///
/// ```
/// info!("Fetching playlist {}", playlist_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// ```
/// success!("Playlist shuffled");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to stderr and exits
/// the process with code 1.
///
/// Only the binary uses this; library functions return [`ShuffleError`].
///
/// ```
/// error!("{}", err);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// ```
/// warning!("Skipped {} local tracks", skipped);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
