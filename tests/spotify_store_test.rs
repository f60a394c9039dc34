//! SpotifyStore against a mocked Web API

use chrono::Utc;
use serde_json::json;
use sporlshuffle::{
    ShuffleError, StoreError,
    management::{ShuffleOptions, TokenManager, fetch_all, shuffle_playlist},
    spotify::SpotifyStore,
    store::PlaylistStore,
    types::{Credentials, Token},
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials {
        client_id: "client".to_string(),
        client_secret: None,
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
    }
}

fn store_for(server: &MockServer) -> SpotifyStore {
    let token = Token {
        access_token: "test-token".to_string(),
        refresh_token: "refresh".to_string(),
        scope: "playlist-modify-private".to_string(),
        expires_in: 3600,
        obtained_at: Utc::now().timestamp() as u64,
    };
    SpotifyStore::new(
        format!("{}/v1", server.uri()),
        TokenManager::new(token, credentials()),
    )
}

fn uris(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| format!("spotify:track:{}", id)).collect()
}

async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/playlists/pl1/tracks"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "100"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "is_local": false, "track": { "uri": "spotify:track:a" } },
                { "is_local": true, "track": { "uri": "spotify:local:artist:album:song:180" } },
                { "is_local": false, "track": null },
                { "is_local": false, "track": { "uri": "spotify:track:b" } }
            ],
            "next": format!("{}/v1/playlists/pl1/tracks?offset=4&limit=100", server.uri()),
            "offset": 0
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/playlists/pl1/tracks"))
        .and(query_param("offset", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "is_local": false, "track": { "uri": "spotify:track:c" } },
                { "is_local": false, "track": { "uri": "spotify:track:a" } }
            ],
            "next": null,
            "offset": 4
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_first_page() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;
    let store = store_for(&server);

    let page = store.list_page("pl1", None).await.unwrap();

    let ids: Vec<&str> = page.entries.iter().map(|e| e.track_id.as_str()).collect();
    assert_eq!(ids, vec!["spotify:track:a", "spotify:track:b"]);
    assert_eq!(page.entries[1].position_hint, 3);
    assert_eq!(page.skipped, 2);
    assert_eq!(
        page.next_page_token,
        Some(format!(
            "{}/v1/playlists/pl1/tracks?offset=4&limit=100",
            server.uri()
        ))
    );
}

#[tokio::test]
async fn test_fetch_all_follows_next_urls() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;
    let store = store_for(&server);

    let snapshot = fetch_all(&store, "pl1").await.unwrap();

    assert_eq!(snapshot.pages(), 2);
    assert_eq!(snapshot.fetched(), 4);
    assert_eq!(snapshot.skipped(), 2);
    assert_eq!(snapshot.track_ids(), uris(&["a", "b", "c"]));
}

#[tokio::test]
async fn test_remove_sends_track_objects() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/playlists/pl1/tracks"))
        .and(body_json(json!({
            "tracks": [
                { "uri": "spotify:track:a" },
                { "uri": "spotify:track:b" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s1" })))
        .expect(1)
        .mount(&server)
        .await;
    let store = store_for(&server);

    store
        .remove_all_occurrences("pl1", &uris(&["a", "b"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_append_and_replace_send_uris() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/pl1/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:c", "spotify:track:a"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/playlists/pl1/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:b"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s3" })))
        .expect(1)
        .mount(&server)
        .await;
    let store = store_for(&server);

    store
        .append_items("pl1", &uris(&["c", "a"]))
        .await
        .unwrap();
    store.replace_items("pl1", &uris(&["b"])).await.unwrap();

    assert!(store.supports_replace());
    assert_eq!(store.replace_limit(), Some(100));
}

#[tokio::test]
async fn test_oversized_batch_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let store = store_for(&server);
    let ids: Vec<String> = (0..101).map(|i| format!("spotify:track:{}", i)).collect();

    let err = store.append_items("pl1", &ids).await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::BatchTooLarge {
            size: 101,
            limit: 100
        }
    ));
}

#[tokio::test]
async fn test_unauthorized_page_is_a_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;
    let store = store_for(&server);

    let err = fetch_all(&store, "pl1").await.unwrap_err();

    assert!(matches!(
        err,
        ShuffleError::FetchFailure {
            source: StoreError::Unauthorized(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_api_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/missing/tracks"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;
    let store = store_for(&server);

    let err = store.list_page("missing", None).await.unwrap_err();

    assert!(matches!(err, StoreError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_excessive_retry_after_is_not_waited_for() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3600"))
        .expect(1)
        .mount(&server)
        .await;
    let store = store_for(&server);

    let err = store.list_page("pl1", None).await.unwrap_err();

    assert!(matches!(err, StoreError::RateLimited(3600)));
}

#[tokio::test]
async fn test_pipeline_with_local_items_clears_then_appends() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/v1/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let store = store_for(&server);

    // local items on the first page rule out a full replace
    let report = shuffle_playlist(&store, "pl1", ShuffleOptions::default())
        .await
        .unwrap();

    assert_eq!(report.distinct, 3);
    assert_eq!(report.rewrite.unwrap().total_calls(), 2);
}
