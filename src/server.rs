use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use reqwest::Url;
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};

use crate::{
    Res, ShuffleError, api,
    types::{Credentials, PkceToken},
    warning,
};

/// Binds the OAuth callback server on the redirect URI's host and port and
/// serves it in the background.
///
/// The callback is mounted on the redirect URI's path, next to `/health`.
/// Binding happens before this returns, so the browser can be opened right
/// after.
pub async fn start_api_server(
    state: Arc<Mutex<Option<PkceToken>>>,
    credentials: Credentials,
) -> Res<JoinHandle<()>> {
    let redirect = Url::parse(&credentials.redirect_uri).map_err(|e| {
        ShuffleError::Config(format!(
            "invalid SPOTIFY_REDIRECT_URI '{}': {}",
            credentials.redirect_uri, e
        ))
    })?;

    let host = redirect.host_str().unwrap_or("127.0.0.1").to_string();
    let port = redirect.port_or_known_default().unwrap_or(80);
    let callback_path = match redirect.path() {
        "" | "/" => "/callback".to_string(),
        path => path.to_string(),
    };

    let app = Router::new()
        .route("/health", get(api::health))
        .route(&callback_path, get(api::callback))
        .layer(Extension(state))
        .layer(Extension(credentials));

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| ShuffleError::Config(format!("cannot bind {}:{}: {}", host, port, e)))?;

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    }))
}
