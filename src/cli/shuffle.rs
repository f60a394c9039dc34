use tabled::Table;

use crate::{
    Res, config, info,
    locator::parse_playlist_id,
    management::{self, ShuffleOptions, StrategyChoice, TokenManager},
    spotify::{self, SpotifyStore},
    success,
    types::{Credentials, PreviewTableRow},
    warning,
};

/// Shuffles the playlist behind `locator`.
///
/// The locator is parsed and the session established before the playlist is
/// read; a failed fetch leaves the playlist untouched.
pub async fn shuffle(locator: String, strategy: StrategyChoice, dry_run: bool) -> Res<()> {
    let playlist_id = parse_playlist_id(&locator)?;
    let credentials = config::credentials()?;
    let mut tokens = session(credentials).await?;
    tokens.get_valid_token().await?;

    let store = SpotifyStore::new(config::spotify_apiurl(), tokens);

    info!("Shuffling playlist {}", playlist_id);
    let report = management::shuffle_playlist(
        &store,
        &playlist_id,
        ShuffleOptions {
            strategy,
            dry_run,
            show_progress: true,
        },
    )
    .await?;

    info!(
        "Read {} entries in {} pages, {} distinct tracks",
        report.fetched, report.pages, report.distinct
    );
    if report.duplicates() > 0 {
        warning!(
            "{} duplicate entries will appear only once after shuffling",
            report.duplicates()
        );
    }
    if report.skipped > 0 {
        warning!(
            "{} local or unavailable items cannot be moved and stay at the start of the playlist",
            report.skipped
        );
    }

    match report.rewrite {
        Some(summary) => success!(
            "Playlist {} shuffled: {} tracks in {} store calls ({:?})",
            playlist_id,
            report.distinct,
            summary.total_calls(),
            summary.strategy
        ),
        None if dry_run => {
            let rows: Vec<PreviewTableRow> = report
                .order
                .track_ids()
                .iter()
                .enumerate()
                .map(|(i, track)| PreviewTableRow {
                    position: i + 1,
                    track: track.clone(),
                })
                .collect();
            println!("{}", Table::new(rows));
            info!("Dry run, the playlist was not modified");
        }
        None => info!(
            "Nothing to shuffle, the playlist has {} track(s)",
            report.distinct
        ),
    }

    Ok(())
}

async fn session(credentials: Credentials) -> Res<TokenManager> {
    if let Ok(tokens) = TokenManager::load(credentials.clone()).await {
        return Ok(tokens);
    }

    info!("No stored session, waiting for Spotify authorization in the browser...");
    let token = spotify::auth::authorize(&credentials).await?;
    let tokens = TokenManager::new(token, credentials);
    if let Err(e) = tokens.persist().await {
        warning!("Could not store the session token: {}", e);
    }
    Ok(tokens)
}
