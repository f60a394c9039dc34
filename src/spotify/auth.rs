use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    Res, ShuffleError, config,
    server::start_api_server,
    types::{Credentials, PkceToken, Token},
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    expires_in: Option<u64>,
}

/// Runs the OAuth 2.0 authorization code flow with PKCE.
///
/// 1. Generates a code verifier and its S256 challenge
/// 2. Binds the local callback server on the redirect URI's host and port
/// 3. Opens the authorization URL in the browser (or prints it)
/// 4. Waits up to 60 seconds for the callback to exchange the code
///
/// The returned token is not persisted; that is up to the caller.
pub async fn authorize(credentials: &Credentials) -> Res<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier,
        token: None,
        error: None,
    })));

    let server = start_api_server(Arc::clone(&shared_state), credentials.clone()).await?;

    let auth_url = authorization_url(credentials, &code_challenge)?;
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let outcome = wait_for_token(shared_state).await;
    server.abort();
    outcome
}

/// Builds the authorization URL the user has to visit.
pub fn authorization_url(credentials: &Credentials, code_challenge: &str) -> Res<Url> {
    let scope = config::spotify_scope();
    Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", credentials.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|e| ShuffleError::Config(format!("invalid authorization URL: {}", e)))
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Res<Token> {
    let start = std::time::Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        {
            let lock = shared_state.lock().await;
            if let Some(pkce) = lock.as_ref() {
                if let Some(token) = &pkce.token {
                    return Ok(token.clone());
                }
                if let Some(error) = &pkce.error {
                    return Err(ShuffleError::AuthFailure(error.clone()));
                }
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(ShuffleError::AuthFailure(
        "timed out waiting for the authorization callback".to_string(),
    ))
}

/// Exchanges an authorization code and its PKCE verifier for a token.
pub async fn exchange_code_pkce(
    credentials: &Credentials,
    code: &str,
    verifier: &str,
) -> Res<Token> {
    request_token(
        credentials,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", credentials.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", credentials.redirect_uri.as_str()),
        ],
        None,
    )
    .await
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may omit the refresh token from the response, in which case the
/// old one stays valid and is carried over.
pub async fn refresh_token(credentials: &Credentials, refresh_token: &str) -> Res<Token> {
    request_token(
        credentials,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", credentials.client_id.as_str()),
        ],
        Some(refresh_token),
    )
    .await
}

async fn request_token(
    credentials: &Credentials,
    form: &[(&str, &str)],
    previous_refresh: Option<&str>,
) -> Res<Token> {
    let auth_error = |e: reqwest::Error| ShuffleError::AuthFailure(e.to_string());

    let client = Client::new();
    let mut request = client.post(config::spotify_apitoken_url()).form(form);
    if let Some(secret) = &credentials.client_secret {
        request = request.basic_auth(&credentials.client_id, Some(secret));
    }

    let response = request.send().await.map_err(auth_error)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ShuffleError::AuthFailure(format!(
            "token endpoint answered {}: {}",
            status, body
        )));
    }

    let json: TokenResponse = response.json().await.map_err(auth_error)?;
    let refresh_token = json
        .refresh_token
        .or_else(|| previous_refresh.map(str::to_string))
        .ok_or_else(|| ShuffleError::AuthFailure("token response has no refresh token".into()))?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token,
        scope: json.scope,
        expires_in: json.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
