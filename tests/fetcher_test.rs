use sporlshuffle::{
    ShuffleError, StoreError,
    management::{PlaylistFetcher, fetch_all},
    store::{MemoryStore, StoreOp},
};

fn track_ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}

#[tokio::test]
async fn test_fetch_spans_all_pages() {
    let tracks = track_ids("t", 250);
    let store = MemoryStore::with_tracks(tracks.clone()).page_size(100);

    let snapshot = fetch_all(&store, "pl").await.unwrap();

    assert_eq!(snapshot.len(), 250);
    assert_eq!(snapshot.fetched(), 250);
    assert_eq!(snapshot.pages(), 3);
    assert_eq!(snapshot.track_ids(), tracks);

    let pages = store.calls_of(StoreOp::ListPage);
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].page_token, None);
    assert_eq!(pages[1].page_token.as_deref(), Some("100"));
    assert_eq!(pages[2].page_token.as_deref(), Some("200"));
}

#[tokio::test]
async fn test_fetch_issues_one_request_per_page() {
    // pages of 7, 7, 7, 3
    let store = MemoryStore::with_tracks(track_ids("t", 24)).page_size(7);

    let snapshot = fetch_all(&store, "pl").await.unwrap();

    assert_eq!(store.calls_of(StoreOp::ListPage).len(), 4);
    assert_eq!(snapshot.pages(), 4);
    assert_eq!(snapshot.fetched(), 24);
}

#[tokio::test]
async fn test_fetch_keeps_first_occurrence_of_duplicates() {
    let store = MemoryStore::with_tracks(["A", "X", "B", "X", "C"]);

    let snapshot = fetch_all(&store, "pl").await.unwrap();

    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.track_ids(), vec!["A", "X", "B", "C"]);
    assert_eq!(snapshot.fetched(), 5);
    assert_eq!(snapshot.duplicates(), 1);

    // position hints come from the first occurrence
    let x = snapshot
        .entries()
        .iter()
        .find(|e| e.track_id == "X")
        .unwrap();
    assert_eq!(x.position_hint, 1);
}

#[tokio::test]
async fn test_fetch_dedups_across_page_boundaries() {
    let store = MemoryStore::with_tracks(["a", "b", "c", "a", "d", "b", "e", "a"]).page_size(3);

    let snapshot = fetch_all(&store, "pl").await.unwrap();

    assert_eq!(snapshot.track_ids(), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(snapshot.pages(), 3);
    assert_eq!(snapshot.fetched(), 8);
}

#[tokio::test]
async fn test_fetch_empty_playlist() {
    let store = MemoryStore::new();

    let snapshot = fetch_all(&store, "pl").await.unwrap();

    assert!(snapshot.is_empty());
    assert_eq!(snapshot.pages(), 1);
}

#[tokio::test]
async fn test_fetch_failure_aborts_without_snapshot() {
    let store = MemoryStore::with_tracks(track_ids("t", 250))
        .page_size(100)
        .fail_on(StoreOp::ListPage, 2);

    let err = fetch_all(&store, "pl").await.unwrap_err();

    match err {
        ShuffleError::FetchFailure {
            playlist_id,
            source,
        } => {
            assert_eq!(playlist_id, "pl");
            assert!(matches!(source, StoreError::Api { status: 500, .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // no third page was requested
    assert_eq!(store.calls_of(StoreOp::ListPage).len(), 2);
}

#[tokio::test]
async fn test_fetch_detects_repeated_page_token() {
    let store = MemoryStore::with_tracks(["a", "b", "c"])
        .page_size(1)
        .looping_pages();

    let err = PlaylistFetcher::new(&store).fetch_all("pl").await.unwrap_err();

    assert!(matches!(
        err,
        ShuffleError::FetchFailure {
            source: StoreError::Other(_),
            ..
        }
    ));
    assert_eq!(store.calls_of(StoreOp::ListPage).len(), 2);
}

#[tokio::test]
async fn test_fetch_counts_skipped_items() {
    let store = MemoryStore::with_tracks(["a", "b"]).with_local_items(2);

    let snapshot = fetch_all(&store, "pl").await.unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.skipped(), 2);
}
