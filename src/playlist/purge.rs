use crate::{
    error::ApiError,
    info,
    playlist::BATCH_SIZE,
    spotify::SpotifyClient,
    types::{PlaylistItem, Session},
    utils,
};

/// Empties and unfollows every playlist owned by the current user.
///
/// # Arguments
///
/// * `client` - Spotify API used for listing, removing and unfollowing
/// * `session` - Request session; its `user_id` decides ownership
///
/// # Behavior
///
/// Playlists are processed one after another: list tracks, remove them in
/// batches of [`BATCH_SIZE`], unfollow. Playlists the account only follows
/// are left alone, since Spotify rejects edits to them; they are neither
/// emptied nor unfollowed nor counted. Playlists without removable tracks
/// are unfollowed without a remove call. Only the first page of playlists
/// is considered.
///
/// # Returns
///
/// The number of playlists deleted.
///
/// # Errors
///
/// The first failing call stops the purge and is returned. Playlists handled
/// before it stay deleted.
pub async fn purge_all(client: &dyn SpotifyClient, session: &Session) -> Result<usize, ApiError> {
    let token = &session.access_token;
    let playlists = client.get_user_playlists(token).await?;

    let mut count = 0;
    for playlist in &playlists {
        if !playlist.is_owned_by(&session.user_id) {
            info!(
                "Skipping playlist {} owned by {}",
                playlist.name, playlist.owner.id
            );
            continue;
        }

        let items = client.get_playlist_tracks(token, &playlist.id).await?;
        let uris = removable_uris(items);

        for chunk in uris.chunks(BATCH_SIZE) {
            client
                .remove_tracks_from_playlist(token, &playlist.id, chunk)
                .await?;
        }

        client.unfollow_playlist(token, &playlist.id).await?;
        info!("Deleted playlist {} ({} tracks)", playlist.name, uris.len());
        count += 1;
    }

    Ok(count)
}

// Local files can't be removed through the API.
fn removable_uris(items: Vec<PlaylistItem>) -> Vec<String> {
    let mut uris: Vec<String> = items
        .into_iter()
        .filter_map(|item| item.track.and_then(|t| t.uri))
        .filter(|uri| !uri.starts_with("spotify:local:"))
        .collect();
    utils::remove_duplicates(&mut uris);
    uris
}

/// Success message reported by the clear route, e.g.
/// `"3 playlists deleted successfully."`.
pub fn purge_message(count: usize) -> String {
    format!("{count} playlists deleted successfully.")
}
