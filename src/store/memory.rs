use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Page, PlaylistStore, check_batch, check_batch_limit};
use crate::{StoreError, types::TrackEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    ListPage,
    Remove,
    Append,
    Replace,
}

/// A call received by a [`MemoryStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub page_token: Option<String>,
    pub track_ids: Vec<String>,
}

/// In-memory playlist store.
///
/// Holds a single playlist (the playlist id is ignored), pages it by offset
/// tokens and enforces the same batch limit as the remote store. Every call is
/// logged, and a failure can be injected on the n-th call of an operation.
pub struct MemoryStore {
    items: Mutex<Vec<String>>,
    calls: Mutex<Vec<StoreCall>>,
    page_size: usize,
    replace: Option<Option<usize>>,
    fail_on: Option<(StoreOp, usize)>,
    looping_pages: bool,
    local_items: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            page_size: 100,
            replace: None,
            fail_on: None,
            looping_pages: false,
            local_items: 0,
        }
    }

    pub fn with_tracks<I, S>(tracks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        *lock(&store.items) = tracks.into_iter().map(Into::into).collect();
        store
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Enables `replace_items`, optionally capped at `limit` ids per call.
    pub fn with_replace(mut self, limit: Option<usize>) -> Self {
        self.replace = Some(limit);
        self
    }

    /// Fails the `nth` (1-based) call of `op`.
    pub fn fail_on(mut self, op: StoreOp, nth: usize) -> Self {
        self.fail_on = Some((op, nth));
        self
    }

    /// Makes every page point back at the first one.
    pub fn looping_pages(mut self) -> Self {
        self.looping_pages = true;
        self
    }

    /// Reports `count` unaddressable items on the first page.
    pub fn with_local_items(mut self, count: usize) -> Self {
        self.local_items = count;
        self
    }

    pub fn tracks(&self) -> Vec<String> {
        lock(&self.items).clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn calls_of(&self, op: StoreOp) -> Vec<StoreCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    fn record(
        &self,
        op: StoreOp,
        page_token: Option<&str>,
        track_ids: &[String],
    ) -> Result<(), StoreError> {
        let mut calls = lock(&self.calls);
        calls.push(StoreCall {
            op,
            page_token: page_token.map(str::to_string),
            track_ids: track_ids.to_vec(),
        });

        if let Some((fail_op, nth)) = self.fail_on {
            let seen = calls.iter().filter(|c| c.op == op).count();
            if fail_op == op && seen == nth {
                return Err(StoreError::Api {
                    status: 500,
                    message: format!("injected failure on {:?} call {}", op, nth),
                });
            }
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaylistStore for MemoryStore {
    async fn list_page(
        &self,
        _playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page, StoreError> {
        self.record(StoreOp::ListPage, page_token, &[])?;

        let offset = match page_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| StoreError::Other(format!("bad page token '{}'", token)))?,
            None => 0,
        };

        let items = lock(&self.items);
        let end = (offset + self.page_size).min(items.len());
        let entries = items
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, id)| TrackEntry::new(id.clone(), offset + i))
            .collect();

        let next_page_token = if self.looping_pages {
            Some("0".to_string())
        } else if end < items.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(Page {
            entries,
            next_page_token,
            skipped: if offset == 0 { self.local_items } else { 0 },
        })
    }

    async fn remove_all_occurrences(
        &self,
        _playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), StoreError> {
        self.record(StoreOp::Remove, None, track_ids)?;
        check_batch(track_ids)?;
        lock(&self.items).retain(|t| !track_ids.contains(t));
        Ok(())
    }

    async fn append_items(
        &self,
        _playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), StoreError> {
        self.record(StoreOp::Append, None, track_ids)?;
        check_batch(track_ids)?;
        lock(&self.items).extend_from_slice(track_ids);
        Ok(())
    }

    async fn replace_items(
        &self,
        _playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), StoreError> {
        let Some(limit) = self.replace else {
            return Err(StoreError::Unsupported("replace_items"));
        };
        self.record(StoreOp::Replace, None, track_ids)?;
        if let Some(limit) = limit {
            check_batch_limit(track_ids, limit)?;
        }
        *lock(&self.items) = track_ids.to_vec();
        Ok(())
    }

    fn supports_replace(&self) -> bool {
        self.replace.is_some()
    }

    fn replace_limit(&self) -> Option<usize> {
        self.replace.flatten()
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
