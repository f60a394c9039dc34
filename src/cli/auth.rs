use crate::{Res, config, info, management::TokenManager, spotify, success};

/// Runs the OAuth flow and stores the resulting token for later runs.
pub async fn auth() -> Res<()> {
    let credentials = config::credentials()?;

    info!("Waiting for Spotify authorization in the browser...");
    let token = spotify::auth::authorize(&credentials).await?;
    TokenManager::new(token, credentials).persist().await?;

    success!("Authentication successful!");
    Ok(())
}
