use std::collections::HashSet;

use indicatif::ProgressBar;

use crate::{
    Res, ShuffleError, StoreError,
    store::PlaylistStore,
    types::PlaylistSnapshot,
};

/// Reads a whole playlist, page by page, into a [`PlaylistSnapshot`].
pub struct PlaylistFetcher<'a, S: PlaylistStore + ?Sized> {
    store: &'a S,
    progress: ProgressBar,
}

impl<'a, S: PlaylistStore + ?Sized> PlaylistFetcher<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports fetched pages on the given spinner.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Requests pages until the store returns no continuation token, then
    /// drops repeated tracks keeping their first position.
    ///
    /// Any failed page aborts the fetch; no partial snapshot is returned.
    pub async fn fetch_all(&self, playlist_id: &str) -> Res<PlaylistSnapshot> {
        let snapshot = self.collect_pages(playlist_id).await;
        self.progress.finish_and_clear();
        snapshot
    }

    async fn collect_pages(&self, playlist_id: &str) -> Res<PlaylistSnapshot> {
        let mut entries = Vec::new();
        let mut pages = 0;
        let mut skipped = 0;
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let page = self
                .store
                .list_page(playlist_id, page_token.as_deref())
                .await
                .map_err(|source| fetch_failure(playlist_id, source))?;

            pages += 1;
            skipped += page.skipped;
            entries.extend(page.entries);
            self.progress.set_message(format!(
                "Fetched {} tracks in {} pages...",
                entries.len(),
                pages
            ));

            match page.next_page_token {
                Some(next) => {
                    if !seen_tokens.insert(next.clone()) {
                        return Err(fetch_failure(
                            playlist_id,
                            StoreError::Other(format!("page token '{}' was returned twice", next)),
                        ));
                    }
                    page_token = Some(next);
                }
                None => break,
            }
        }

        Ok(PlaylistSnapshot::from_entries(entries, pages).with_skipped(skipped))
    }
}

/// Fetches the full, deduplicated content of `playlist_id`.
pub async fn fetch_all<S: PlaylistStore + ?Sized>(
    store: &S,
    playlist_id: &str,
) -> Res<PlaylistSnapshot> {
    PlaylistFetcher::new(store).fetch_all(playlist_id).await
}

fn fetch_failure(playlist_id: &str, source: StoreError) -> ShuffleError {
    ShuffleError::FetchFailure {
        playlist_id: playlist_id.to_string(),
        source,
    }
}
