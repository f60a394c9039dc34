use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    StoreError,
    management::TokenManager,
    store::{MAX_BATCH_SIZE, Page, PlaylistStore, check_batch},
    types::{PlaylistItemsResponse, RemoveTracksRequest, TrackEntry, TrackUri, TrackUrisRequest},
    warning,
};

const PAGE_LIMIT: &str = "100";
const ITEM_FIELDS: &str = "items(is_local,track(uri)),next,offset";
const MAX_RETRIES: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// [`PlaylistStore`] backed by the Spotify Web API.
///
/// Track identifiers are Spotify URIs (`spotify:track:...`,
/// `spotify:episode:...`). Page tokens are the `next` URLs Spotify returns.
pub struct SpotifyStore {
    client: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyStore {
    pub fn new(api_url: impl Into<String>, tokens: TokenManager) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    fn tracks_url(&self, playlist_id: &str) -> String {
        format!("{}/playlists/{}/tracks", self.api_url, playlist_id)
    }

    /// Sends the request built by `build`, retrying 502 responses and
    /// honouring `Retry-After` on 429, at most [`MAX_RETRIES`] times.
    async fn send<F>(&self, build: F) -> Result<Response, StoreError>
    where
        F: Fn(&Client, &str) -> RequestBuilder + Send + Sync,
    {
        let mut retries = 0;

        loop {
            let token = self
                .tokens
                .lock()
                .await
                .get_valid_token()
                .await
                .map_err(|e| StoreError::Unauthorized(e.to_string()))?;

            let response = build(&self.client, &token).send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::BAD_GATEWAY && retries < MAX_RETRIES {
                retries += 1;
                sleep(Duration::from_secs(10)).await;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after_secs(&response);
                if retries < MAX_RETRIES && retry_after <= MAX_RETRY_AFTER_SECS {
                    warning!("Rate limited by Spotify, retrying in {} seconds", retry_after);
                    retries += 1;
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                return Err(StoreError::RateLimited(retry_after));
            }

            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::from_status(status.as_u16(), body));
        }
    }
}

#[async_trait]
impl PlaylistStore for SpotifyStore {
    async fn list_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page, StoreError> {
        let response = match page_token {
            Some(next_url) => {
                self.send(|client, token| client.get(next_url).bearer_auth(token))
                    .await?
            }
            None => {
                let url = self.tracks_url(playlist_id);
                self.send(|client, token| {
                    client
                        .get(&url)
                        .query(&[("fields", ITEM_FIELDS), ("limit", PAGE_LIMIT), ("offset", "0")])
                        .bearer_auth(token)
                })
                .await?
            }
        };

        let body = response.json::<PlaylistItemsResponse>().await?;

        let mut entries = Vec::with_capacity(body.items.len());
        let mut skipped = 0;
        for (i, item) in body.items.into_iter().enumerate() {
            match item.track.and_then(|t| t.uri) {
                Some(uri) if !item.is_local => entries.push(TrackEntry::new(uri, body.offset + i)),
                _ => skipped += 1,
            }
        }

        Ok(Page {
            entries,
            next_page_token: body.next,
            skipped,
        })
    }

    async fn remove_all_occurrences(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), StoreError> {
        check_batch(track_ids)?;
        let url = self.tracks_url(playlist_id);
        let body = RemoveTracksRequest {
            tracks: track_ids
                .iter()
                .map(|uri| TrackUri { uri: uri.clone() })
                .collect(),
        };

        self.send(|client, token| client.delete(&url).bearer_auth(token).json(&body))
            .await?;
        Ok(())
    }

    async fn append_items(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), StoreError> {
        check_batch(track_ids)?;
        let url = self.tracks_url(playlist_id);
        let body = TrackUrisRequest {
            uris: track_ids.to_vec(),
        };

        self.send(|client, token| client.post(&url).bearer_auth(token).json(&body))
            .await?;
        Ok(())
    }

    async fn replace_items(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), StoreError> {
        check_batch(track_ids)?;
        let url = self.tracks_url(playlist_id);
        let body = TrackUrisRequest {
            uris: track_ids.to_vec(),
        };

        self.send(|client, token| client.put(&url).bearer_auth(token).json(&body))
            .await?;
        Ok(())
    }

    fn supports_replace(&self) -> bool {
        true
    }

    // PUT /playlists/{id}/tracks takes at most 100 uris
    fn replace_limit(&self) -> Option<usize> {
        Some(MAX_BATCH_SIZE)
    }

    fn name(&self) -> &str {
        "spotify"
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1)
}
