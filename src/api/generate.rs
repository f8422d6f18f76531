use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    body::Bytes,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, ConfigError},
    info, playlist,
    server::AppState,
    spotify::auth::authorize_url,
    success,
    types::{AuthStrategy, PlaylistRequest},
    utils, warning,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SongsField {
    List(Vec<String>),
    Csv(String),
}

impl SongsField {
    fn into_songs(self) -> Vec<String> {
        match self {
            SongsField::List(songs) => songs,
            SongsField::Csv(songs) => utils::parse_song_list(&songs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistBody {
    songs: Option<SongsField>,
    name: Option<String>,
}

/// `GET|POST /generatePlaylist`: creates a playlist from a list of songs.
///
/// Input comes from a non-empty JSON object body, otherwise from the query
/// string (`songs` comma separated, `name`). With the interactive strategy
/// the caller is redirected to Spotify's authorization page instead and the
/// playlist is created in [`callback`](super::callback).
pub async fn generate_playlist(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = parse_request(&params, &body)
        .inspect_err(|e| warning!("Rejected playlist request: {}", e))?;

    if state.config.auth_strategy == AuthStrategy::Interactive {
        let payload = serde_json::to_string(&request)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let url = authorize_url(&state.config, &payload).map_err(|_| {
            AppError::Config(ConfigError::Invalid {
                key: "SPOTIFY_AUTH_URL",
                value: state.config.auth_url.clone(),
            })
        })?;

        info!("Redirecting to authorization for playlist {}", request.name);
        return Ok(Redirect::to(&url).into_response());
    }

    info!(
        "Creating playlist {} from {} songs",
        request.name,
        request.songs.len()
    );
    let (result, _) = async {
        let session = state.auth.ensure_authenticated().await?;
        playlist::generate(
            state.client.as_ref(),
            &session,
            &request,
            state.config.visibility,
        )
        .await
    }
    .await
    .inspect_err(|e| warning!("/generatePlaylist failed: {}", e))?;

    success!("Playlist {} created: {}", request.name, result.playlist_url);
    Ok(Json(result).into_response())
}

/// Reads the request from the JSON body when it is a non-empty object,
/// falling back to the query string.
pub fn parse_request(
    params: &HashMap<String, String>,
    body: &[u8],
) -> Result<PlaylistRequest, AppError> {
    if let Some(body) = parse_body(body)? {
        return PlaylistRequest::new(body.songs.map(SongsField::into_songs), body.name);
    }

    PlaylistRequest::new(
        params.get("songs").map(|songs| utils::parse_song_list(songs)),
        params.get("name").cloned(),
    )
}

fn parse_body(body: &[u8]) -> Result<Option<PlaylistBody>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
    let Value::Object(fields) = &value else {
        return Err(AppError::Validation(
            "JSON body must be an object".to_string(),
        ));
    };
    if fields.is_empty() {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))
}
