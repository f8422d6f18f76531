use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::spinner::spinner,
    config::Config,
    error,
    management::{AuthManager, TokenStore},
    playlist,
    spotify::{HttpSpotify, SpotifyClient},
    success,
    types::{PlaylistRequest, ResolvedTableRow, ResolvedTrack, Visibility},
    warning,
};

fn auth_manager(config: &Config, client: Arc<dyn SpotifyClient>) -> AuthManager {
    AuthManager::new(client, TokenStore::new(config.token_file.clone()))
}

/// Creates a playlist from the terminal, mirroring `/generatePlaylist`.
pub async fn create(config: &Config, name: String, songs: Vec<String>, public: bool) {
    let request = match PlaylistRequest::new(Some(songs), Some(name)) {
        Ok(request) => request,
        Err(e) => error!("{}", e),
    };
    let visibility = if public {
        Visibility::Public
    } else {
        config.visibility
    };

    let client: Arc<dyn SpotifyClient> = Arc::new(HttpSpotify::new(config));
    let auth = auth_manager(config, Arc::clone(&client));

    let pb = spinner(&format!(
        "Searching {} songs for {}...",
        request.songs.len(),
        request.name
    ));
    let outcome = async {
        let session = auth.ensure_authenticated().await?;
        playlist::generate(client.as_ref(), &session, &request, visibility).await
    }
    .await;
    pb.finish_and_clear();

    let (result, resolved) = match outcome {
        Ok(outcome) => outcome,
        Err(e) => error!("Failed to create playlist: {}", e),
    };

    println!("{}", Table::new(table_rows(&resolved)));
    if !result.unmatched.is_empty() {
        warning!("No match for: {}", result.unmatched.join(", "));
    }
    success!(
        "Playlist {} created with {} tracks: {}",
        request.name,
        result.track_count,
        result.playlist_url
    );
}

/// Deletes every playlist of the account from the terminal.
pub async fn clear(config: &Config) {
    let client: Arc<dyn SpotifyClient> = Arc::new(HttpSpotify::new(config));
    let auth = auth_manager(config, Arc::clone(&client));

    let pb = spinner("Deleting playlists...");
    let outcome = async {
        let session = auth.ensure_authenticated().await?;
        playlist::purge(client.as_ref(), &session).await
    }
    .await;
    pb.finish_and_clear();

    match outcome {
        Ok(result) => success!("{}", result.message),
        Err(e) => error!("Failed to delete playlists: {}", e),
    }
}

fn table_rows(resolved: &[ResolvedTrack]) -> Vec<ResolvedTableRow> {
    resolved
        .iter()
        .map(|r| ResolvedTableRow {
            query: r.query.clone(),
            track: r
                .track
                .as_ref()
                .map_or_else(|| "-".to_string(), |t| t.name.clone()),
            artists: r.track.as_ref().map_or_else(String::new, |t| {
                t.artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
        })
        .collect()
}
