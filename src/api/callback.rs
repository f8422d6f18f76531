use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::{
    error::AppError,
    playlist,
    server::AppState,
    success,
    types::{PendingAuthorization, PlaylistRequest, Session},
    warning,
};

/// `GET /callback` of the interactive strategy.
///
/// Spotify redirects here with `code` and the `state` that carries the
/// JSON-encoded playlist request. The exchanged token is used for this
/// request only and never persisted.
pub async fn callback(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    if let Some(error) = params.get("error") {
        warning!("Callback Error: {}", error);
        return Ok((StatusCode::BAD_REQUEST, format!("Callback Error: {error}")).into_response());
    }

    let result = async {
        let request = request_from_state(params.get("state"))?;
        let code = params
            .get("code")
            .ok_or_else(|| AppError::Validation("Missing authorization code".to_string()))?;

        let token = state
            .client
            .authorization_code_grant(code)
            .await
            .map_err(|e| AppError::Auth(format!("token exchange failed: {e}")))?;
        let user = state
            .client
            .get_me(&token.access_token)
            .await
            .map_err(|e| AppError::Auth(format!("issued token rejected: {e}")))?;
        let session = Session {
            access_token: token.access_token,
            user_id: user.id,
        };

        let (result, _) = playlist::generate(
            state.client.as_ref(),
            &session,
            &request,
            state.config.visibility,
        )
        .await?;
        Ok::<_, AppError>(result)
    }
    .await
    .inspect_err(|e| warning!("/callback failed: {}", e))?;

    success!("Playlist created: {}", result.playlist_url);
    Ok(Json(result).into_response())
}

fn request_from_state(state: Option<&String>) -> Result<PlaylistRequest, AppError> {
    let state = state.ok_or_else(|| AppError::Validation("Missing state".to_string()))?;
    let request: PlaylistRequest = serde_json::from_str(state)
        .map_err(|e| AppError::Validation(format!("Invalid state: {e}")))?;
    PlaylistRequest::new(Some(request.songs), Some(request.name))
}

/// `GET /callback` of the temporary server started by `songlist auth`.
///
/// Records the authorization code (or the error) for the waiting auth flow
/// after checking that `state` matches the one sent to Spotify.
pub async fn authorize_callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PendingAuthorization>>>>,
) -> Html<&'static str> {
    let mut lock = shared_state.lock().await;
    let Some(pending) = lock.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state") != Some(&pending.state) {
        warning!("Callback state mismatch, ignoring request");
        return Html("<h4>State mismatch.</h4>");
    }

    if let Some(error) = params.get("error") {
        pending.error = Some(error.clone());
        return Html("<h4>Login failed.</h4>");
    }

    match params.get("code") {
        Some(code) => {
            pending.code = Some(code.clone());
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        None => Html("<h4>Missing authorization code.</h4>"),
    }
}
