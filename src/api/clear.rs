use std::sync::Arc;

use axum::{Extension, Json};

use crate::{error::AppError, playlist, server::AppState, success, types::PurgeResult, warning};

/// `GET /clear`: deletes every playlist of the authenticated account.
pub async fn clear(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<PurgeResult>, AppError> {
    let result = async {
        let session = state.auth.ensure_authenticated().await?;
        playlist::purge(state.client.as_ref(), &session).await
    }
    .await
    .inspect_err(|e| warning!("GET /clear failed: {}", e))?;

    success!("{}", result.message);
    Ok(Json(result))
}
