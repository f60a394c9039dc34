mod auth;
mod fetcher;
mod pipeline;
mod rewriter;
mod shuffler;

pub use auth::TokenManager;
pub use fetcher::{PlaylistFetcher, fetch_all};
pub use pipeline::{ShuffleOptions, ShuffleReport, shuffle_playlist};
pub use rewriter::{
    PlaylistRewriter, RewriteStrategy, RewriteSummary, StrategyChoice, batch_ranges, rewrite,
};
pub use shuffler::{shuffle, shuffle_with};
