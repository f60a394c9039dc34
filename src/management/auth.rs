use std::path::PathBuf;

use chrono::Utc;

use crate::{
    Res, ShuffleError, config, spotify,
    types::{Credentials, Token},
    warning,
};

/// Owns the OAuth token of the current session.
///
/// The token lives in `<data_local_dir>/sporlshuffle/cache/token.json` and is
/// refreshed four minutes before it expires.
pub struct TokenManager {
    token: Token,
    credentials: Credentials,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, credentials: Credentials) -> Self {
        TokenManager {
            token,
            credentials,
            path: Self::token_path(),
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    pub async fn load(credentials: Credentials) -> Res<Self> {
        Self::load_from(Self::token_path(), credentials).await
    }

    pub async fn load_from(path: PathBuf, credentials: Credentials) -> Res<Self> {
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            ShuffleError::AuthFailure(format!("no stored token at {}: {}", path.display(), e))
        })?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| ShuffleError::AuthFailure(format!("stored token is unreadable: {}", e)))?;
        Ok(Self {
            token,
            credentials,
            path,
        })
    }

    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| ShuffleError::Config(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(&self.token)
            .map_err(|e| ShuffleError::Config(e.to_string()))?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| ShuffleError::Config(e.to_string()))
    }

    /// Returns an access token, refreshing it first when it is about to expire.
    pub async fn get_valid_token(&mut self) -> Res<String> {
        if self.is_expired() {
            let refreshed =
                spotify::auth::refresh_token(&self.credentials, &self.token.refresh_token).await?;
            self.token = refreshed;
            if let Err(e) = self.persist().await {
                warning!("Could not cache the refreshed token: {}", e);
            }
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= (self.token.obtained_at + self.token.expires_in).saturating_sub(240)
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}
