use futures::future::try_join_all;

use crate::{
    error::ApiError,
    spotify::SpotifyClient,
    types::{ResolvedTrack, Session},
};

/// Resolves every song to the top search result, one search per song.
///
/// # Arguments
///
/// * `client` - Spotify API used for the track searches
/// * `session` - Request session providing the access token
/// * `songs` - Free-text queries such as `"Queen Bohemian Rhapsody"`
///
/// # Behavior
///
/// All searches run concurrently and the function returns once every one
/// of them settled. The result has one entry per song in input order; a song
/// without any search hit yields an entry without a track.
///
/// # Errors
///
/// The first failing search fails the whole resolution and no partial
/// result is returned.
pub async fn resolve(
    client: &dyn SpotifyClient,
    session: &Session,
    songs: &[String],
) -> Result<Vec<ResolvedTrack>, ApiError> {
    let searches = songs.iter().map(|song| async move {
        let tracks = client.search_tracks(&session.access_token, song, 1).await?;
        Ok::<_, ApiError>(ResolvedTrack {
            query: song.clone(),
            track: tracks.into_iter().next(),
        })
    });

    try_join_all(searches).await
}

/// Ids of the matched tracks, unmatched entries dropped.
pub fn matched_ids(resolved: &[ResolvedTrack]) -> Vec<String> {
    resolved
        .iter()
        .filter_map(|r| r.track_id().map(str::to_string))
        .collect()
}

pub fn unmatched_queries(resolved: &[ResolvedTrack]) -> Vec<String> {
    resolved
        .iter()
        .filter(|r| r.track.is_none())
        .map(|r| r.query.clone())
        .collect()
}
