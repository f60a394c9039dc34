use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::{
    fetcher::PlaylistFetcher,
    rewriter::{PlaylistRewriter, RewriteStrategy, RewriteSummary, StrategyChoice},
    shuffler,
};
use crate::{Res, ShuffleError, store::PlaylistStore, types::ShuffledOrder};

#[derive(Debug, Clone, Default)]
pub struct ShuffleOptions {
    pub strategy: StrategyChoice,
    /// Fetch and shuffle only; nothing is written.
    pub dry_run: bool,
    /// Show a spinner while fetching and a bar while rewriting.
    pub show_progress: bool,
}

/// Outcome of a shuffle run.
#[derive(Debug, Clone)]
pub struct ShuffleReport {
    pub pages: usize,
    pub fetched: usize,
    pub distinct: usize,
    pub skipped: usize,
    pub order: ShuffledOrder,
    /// `None` for dry runs and for playlists with fewer than two entries.
    pub rewrite: Option<RewriteSummary>,
}

impl ShuffleReport {
    pub fn duplicates(&self) -> usize {
        self.fetched - self.distinct
    }
}

/// Runs fetch, shuffle and rewrite against `store`, strictly in sequence.
///
/// The strategy is resolved before the first store call. A store that skipped
/// unaddressable items (local files) forces clear-then-append under `Auto`,
/// and rejects an explicit `Replace`, since a full replace would drop them.
pub async fn shuffle_playlist<S: PlaylistStore + ?Sized>(
    store: &S,
    playlist_id: &str,
    options: ShuffleOptions,
) -> Res<ShuffleReport> {
    let mut strategy = options.strategy.resolve(store)?;

    let mut fetcher = PlaylistFetcher::new(store);
    if options.show_progress {
        fetcher = fetcher.with_progress(spinner("Fetching playlist tracks..."));
    }
    let snapshot = fetcher.fetch_all(playlist_id).await?;

    if snapshot.skipped() > 0 && strategy == RewriteStrategy::ReplaceInPlace {
        if options.strategy == StrategyChoice::Replace {
            return Err(ShuffleError::Config(format!(
                "replacing the playlist would drop {} local or unavailable items; use clear-append",
                snapshot.skipped()
            )));
        }
        strategy = RewriteStrategy::ClearThenAppend;
    }

    let order = shuffler::shuffle(&snapshot);

    // a single distinct track still needs a rewrite to drop its duplicates
    let unchanged = snapshot.len() < 2 && snapshot.duplicates() == 0;
    let rewrite = if options.dry_run || unchanged {
        None
    } else {
        let mut rewriter = PlaylistRewriter::new(store, strategy);
        if options.show_progress {
            rewriter = rewriter.with_progress(progress_bar());
        }
        Some(rewriter.rewrite(playlist_id, &order).await?)
    };

    Ok(ShuffleReport {
        pages: snapshot.pages(),
        fetched: snapshot.fetched(),
        distinct: snapshot.len(),
        skipped: snapshot.skipped(),
        order,
        rewrite,
    })
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.green/blue} {pos}/{len} batches") {
        pb.set_style(style);
    }
    pb
}
