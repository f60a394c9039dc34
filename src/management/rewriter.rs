use std::ops::Range;

use indicatif::ProgressBar;

use crate::{
    BatchStage, Res, ShuffleError, StoreError,
    store::{MAX_BATCH_SIZE, PlaylistStore},
    types::ShuffledOrder,
};

/// How the new order is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteStrategy {
    /// One `replace_items` call, followed by appends when the store caps the
    /// replace payload below the order length.
    ReplaceInPlace,
    /// Remove every track in batches, then append the new order in batches.
    ClearThenAppend,
}

/// Strategy requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyChoice {
    /// Replace when the store supports it, clear-then-append otherwise.
    #[default]
    Auto,
    Replace,
    ClearThenAppend,
}

impl StrategyChoice {
    /// Picks the concrete strategy for `store`.
    ///
    /// `Replace` on a store without `replace_items` is a configuration error,
    /// raised before anything is fetched or written.
    pub fn resolve<S: PlaylistStore + ?Sized>(self, store: &S) -> Res<RewriteStrategy> {
        match self {
            StrategyChoice::Auto if store.supports_replace() => {
                Ok(RewriteStrategy::ReplaceInPlace)
            }
            StrategyChoice::Auto => Ok(RewriteStrategy::ClearThenAppend),
            StrategyChoice::Replace if store.supports_replace() => {
                Ok(RewriteStrategy::ReplaceInPlace)
            }
            StrategyChoice::Replace => Err(ShuffleError::Config(format!(
                "the {} store does not support replacing playlist items",
                store.name()
            ))),
            StrategyChoice::ClearThenAppend => Ok(RewriteStrategy::ClearThenAppend),
        }
    }
}

/// Calls issued by one rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSummary {
    pub strategy: RewriteStrategy,
    pub removal_batches: usize,
    pub append_batches: usize,
    pub replace_calls: usize,
}

impl RewriteSummary {
    fn new(strategy: RewriteStrategy) -> Self {
        Self {
            strategy,
            removal_batches: 0,
            append_batches: 0,
            replace_calls: 0,
        }
    }

    pub fn total_calls(&self) -> usize {
        self.removal_batches + self.append_batches + self.replace_calls
    }
}

/// Splits `0..len` into consecutive ranges of at most `size` items.
///
/// Yields `ceil(len / size)` ranges; a `size` of zero is treated as one.
pub fn batch_ranges(len: usize, size: usize) -> Vec<Range<usize>> {
    let size = size.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

/// Writes a new order back to the store.
///
/// Batches are sent one at a time, each after the previous one was
/// acknowledged. The first failing batch stops the rewrite and is reported as
/// [`ShuffleError::BatchFailure`] with its stage and index range.
pub struct PlaylistRewriter<'a, S: PlaylistStore + ?Sized> {
    store: &'a S,
    strategy: RewriteStrategy,
    progress: ProgressBar,
}

impl<'a, S: PlaylistStore + ?Sized> PlaylistRewriter<'a, S> {
    pub fn new(store: &'a S, strategy: RewriteStrategy) -> Self {
        Self {
            store,
            strategy,
            progress: ProgressBar::hidden(),
        }
    }

    /// Advances the given bar once per acknowledged batch.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub async fn rewrite(
        &self,
        playlist_id: &str,
        new_order: &ShuffledOrder,
    ) -> Res<RewriteSummary> {
        let track_ids = new_order.track_ids();
        let summary = match self.strategy {
            RewriteStrategy::ClearThenAppend => {
                self.clear_then_append(playlist_id, track_ids).await
            }
            RewriteStrategy::ReplaceInPlace => self.replace_in_place(playlist_id, track_ids).await,
        };

        self.progress.finish_and_clear();
        summary
    }

    async fn clear_then_append(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Res<RewriteSummary> {
        let mut summary = RewriteSummary::new(RewriteStrategy::ClearThenAppend);
        let ranges = batch_ranges(track_ids.len(), MAX_BATCH_SIZE);
        self.progress.set_length((ranges.len() * 2) as u64);

        // every id is unique, so each is removed exactly once
        for (batch, range) in ranges.iter().enumerate() {
            self.store
                .remove_all_occurrences(playlist_id, &track_ids[range.clone()])
                .await
                .map_err(|source| batch_failure(BatchStage::Removal, batch, range, source))?;
            summary.removal_batches += 1;
            self.progress.inc(1);
        }

        summary.append_batches = self.append_ranges(playlist_id, track_ids, &ranges).await?;
        Ok(summary)
    }

    async fn replace_in_place(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Res<RewriteSummary> {
        let mut summary = RewriteSummary::new(RewriteStrategy::ReplaceInPlace);
        let head = match self.store.replace_limit() {
            Some(limit) => track_ids.len().min(limit.max(1)),
            None => track_ids.len(),
        };

        // a capped replace keeps only the first chunk; the tail goes in as appends
        let tail: Vec<Range<usize>> = batch_ranges(track_ids.len() - head, MAX_BATCH_SIZE)
            .into_iter()
            .map(|r| r.start + head..r.end + head)
            .collect();
        self.progress.set_length((1 + tail.len()) as u64);

        let range = 0..head;
        self.store
            .replace_items(playlist_id, &track_ids[range.clone()])
            .await
            .map_err(|source| batch_failure(BatchStage::Replace, 0, &range, source))?;
        summary.replace_calls = 1;
        self.progress.inc(1);

        summary.append_batches = self.append_ranges(playlist_id, track_ids, &tail).await?;
        Ok(summary)
    }

    async fn append_ranges(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        ranges: &[Range<usize>],
    ) -> Res<usize> {
        for (batch, range) in ranges.iter().enumerate() {
            self.store
                .append_items(playlist_id, &track_ids[range.clone()])
                .await
                .map_err(|source| batch_failure(BatchStage::Append, batch, range, source))?;
            self.progress.inc(1);
        }
        Ok(ranges.len())
    }
}

/// Replaces the content of `playlist_id` with `new_order` using `strategy`.
pub async fn rewrite<S: PlaylistStore + ?Sized>(
    store: &S,
    playlist_id: &str,
    new_order: &ShuffledOrder,
    strategy: RewriteStrategy,
) -> Res<RewriteSummary> {
    PlaylistRewriter::new(store, strategy)
        .rewrite(playlist_id, new_order)
        .await
}

fn batch_failure(
    stage: BatchStage,
    batch: usize,
    range: &Range<usize>,
    source: StoreError,
) -> ShuffleError {
    ShuffleError::BatchFailure {
        stage,
        batch,
        range: range.clone(),
        source,
    }
}
