use crate::{
    error::ApiError,
    playlist::BATCH_SIZE,
    spotify::SpotifyClient,
    types::{PlaylistResult, Session, Visibility},
    utils,
};

/// Creates a playlist named `name` and adds `track_ids` to it.
///
/// # Arguments
///
/// * `client` - Spotify API the playlist is created through
/// * `session` - Request session; the playlist is created for its `user_id`
/// * `name` - Name of the new playlist, used as given
/// * `track_ids` - Spotify track ids in playlist order
/// * `visibility` - Whether the playlist is public or private
///
/// # Behavior
///
/// The playlist is created even when there is nothing to add, in which case
/// no add call is made. Repeated ids are added once, at their first
/// position. Tracks are sent in batches of [`BATCH_SIZE`].
///
/// # Returns
///
/// A [`PlaylistResult`] with the playlist id and url, the number of tracks
/// added and the snapshot id of the last batch (`None` without tracks). The
/// `unmatched` list is left empty for the caller to fill.
///
/// # Errors
///
/// Any failing create or add call. A playlist created before a failing add
/// is not removed again.
pub async fn build(
    client: &dyn SpotifyClient,
    session: &Session,
    name: &str,
    track_ids: &[String],
    visibility: Visibility,
) -> Result<PlaylistResult, ApiError> {
    let playlist = client
        .create_playlist(
            &session.access_token,
            &session.user_id,
            name,
            visibility.is_public(),
        )
        .await?;

    let mut ids = track_ids.to_vec();
    utils::remove_duplicates(&mut ids);
    let uris: Vec<String> = ids.iter().map(|id| utils::track_uri(id)).collect();

    let mut snapshot_id = None;
    for chunk in uris.chunks(BATCH_SIZE) {
        let snapshot = client
            .add_tracks_to_playlist(&session.access_token, &playlist.id, chunk)
            .await?;
        snapshot_id = Some(snapshot);
    }

    Ok(PlaylistResult {
        playlist_url: utils::playlist_url(&playlist.id),
        playlist_id: playlist.id,
        added_tracks: snapshot_id,
        track_count: uris.len(),
        unmatched: Vec::new(),
    })
}
