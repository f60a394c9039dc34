use std::sync::Arc;

use serde_json::Value;
use sporlshuffle::{
    server::start_api_server,
    types::{Credentials, PkceToken},
};
use tokio::sync::Mutex;

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .unwrap()
}

fn credentials(port: u16) -> Credentials {
    Credentials {
        client_id: "client".to_string(),
        client_secret: None,
        redirect_uri: format!("http://127.0.0.1:{}/callback", port),
    }
}

fn pending_state() -> Arc<Mutex<Option<PkceToken>>> {
    Arc::new(Mutex::new(Some(PkceToken {
        code_verifier: "verifier".to_string(),
        token: None,
        error: None,
    })))
}

#[tokio::test]
async fn test_health_endpoint_answers() {
    let port = free_port();
    let server = start_api_server(pending_state(), credentials(port))
        .await
        .unwrap();

    let body: Value = reqwest::get(format!("http://127.0.0.1:{}/health", port))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "sporlshuffle");
    server.abort();
}

#[tokio::test]
async fn test_denied_callback_records_error() {
    let port = free_port();
    let state = pending_state();
    let server = start_api_server(state.clone(), credentials(port))
        .await
        .unwrap();

    let response = reqwest::get(format!(
        "http://127.0.0.1:{}/callback?error=access_denied",
        port
    ))
    .await
    .unwrap();
    assert!(response.status().is_success());

    let guard = state.lock().await;
    let pkce = guard.as_ref().unwrap();
    assert!(pkce.token.is_none());
    assert!(pkce.error.as_deref().unwrap().contains("access_denied"));
    server.abort();
}

#[tokio::test]
async fn test_callback_without_code_leaves_state_pending() {
    let port = free_port();
    let state = pending_state();
    let server = start_api_server(state.clone(), credentials(port))
        .await
        .unwrap();

    let text = reqwest::get(format!("http://127.0.0.1:{}/callback", port))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(text.contains("Missing authorization code"));
    let guard = state.lock().await;
    let pkce = guard.as_ref().unwrap();
    assert!(pkce.token.is_none() && pkce.error.is_none());
    server.abort();
}
