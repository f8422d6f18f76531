//! # Playlist Operations
//!
//! The three steps behind the service's routes:
//!
//! - [`resolve`] - one concurrent top-1 search per requested song
//! - [`build`] - create the playlist and add the matched tracks
//! - [`purge_all`] - empty and unfollow every playlist the account owns
//!
//! [`generate`] chains resolution and building. All resolution finishes
//! before the playlist is created. Every function takes the request's
//! [`Session`] and talks to Spotify through a [`SpotifyClient`], so the
//! same code serves the HTTP routes, the CLI and the tests.

mod build;
mod purge;
mod resolve;

pub use build::build;
pub use purge::{purge_all, purge_message};
pub use resolve::{matched_ids, resolve, unmatched_queries};

use crate::{
    error::AppError,
    info,
    spotify::SpotifyClient,
    types::{PlaylistRequest, PlaylistResult, PurgeResult, ResolvedTrack, Session, Visibility},
};

/// Maximum number of track URIs per add or remove call.
pub const BATCH_SIZE: usize = 100;

impl PlaylistRequest {
    /// Validates raw input into a request.
    ///
    /// Song entries are trimmed and blank ones dropped, the name is trimmed.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] when no song remains or the name is empty.
    pub fn new(songs: Option<Vec<String>>, name: Option<String>) -> Result<Self, AppError> {
        let songs: Vec<String> = songs
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let name = name.map(|n| n.trim().to_string()).unwrap_or_default();

        if songs.is_empty() || name.is_empty() {
            return Err(AppError::Validation(
                "Please provide a non-empty \"songs\" list and a playlist \"name\"".to_string(),
            ));
        }

        Ok(Self { songs, name })
    }
}

/// Resolves the requested songs and builds the playlist from the matches.
///
/// # Arguments
///
/// * `client` - Spotify API used for searching and building
/// * `session` - Request session from [`AuthManager`](crate::management::AuthManager)
/// * `request` - Validated songs and playlist name
/// * `visibility` - Visibility of the created playlist
///
/// # Behavior
///
/// Resolution finishes completely before the playlist is created, so a
/// failing search never leaves an empty playlist behind. Unmatched songs are
/// dropped from the playlist and listed in the result.
///
/// # Returns
///
/// The [`PlaylistResult`] together with the per-song resolution, so callers
/// can show which query matched which track.
pub async fn generate(
    client: &dyn SpotifyClient,
    session: &Session,
    request: &PlaylistRequest,
    visibility: Visibility,
) -> Result<(PlaylistResult, Vec<ResolvedTrack>), AppError> {
    let resolved = resolve(client, session, &request.songs).await?;
    let ids = matched_ids(&resolved);
    info!(
        "Resolved {}/{} songs for playlist {}",
        ids.len(),
        request.songs.len(),
        request.name
    );

    let mut result = build(client, session, &request.name, &ids, visibility).await?;
    result.unmatched = unmatched_queries(&resolved);
    Ok((result, resolved))
}

/// Runs [`purge_all`] and wraps the count for the caller.
pub async fn purge(client: &dyn SpotifyClient, session: &Session) -> Result<PurgeResult, AppError> {
    let count = purge_all(client, session).await?;
    Ok(PurgeResult {
        count,
        message: purge_message(count),
    })
}
