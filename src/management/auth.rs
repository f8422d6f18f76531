use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::{ApiError, AppError},
    management::TokenStore,
    spotify::SpotifyClient,
    types::{Session, TokenRecord},
    warning,
};

/// Keeps the stored token valid and hands out request-scoped sessions.
///
/// One instance is shared by all requests of the service. Calls to
/// [`ensure_authenticated`](Self::ensure_authenticated) are serialized, so
/// concurrent requests never refresh the same token twice or interleave
/// writes to the token file.
///
/// # Example
///
/// ```
/// let auth = AuthManager::new(client, TokenStore::new(config.token_file.clone()));
/// let session = auth.ensure_authenticated().await?;
/// playlist::purge(client.as_ref(), &session).await?;
/// ```
pub struct AuthManager {
    client: Arc<dyn SpotifyClient>,
    store: TokenStore,
    // Serializes load, probe, refresh and persist across requests.
    lock: Mutex<()>,
}

impl AuthManager {
    pub fn new(client: Arc<dyn SpotifyClient>, store: TokenStore) -> Self {
        AuthManager {
            client,
            store,
            lock: Mutex::new(()),
        }
    }

    /// Returns a session with a working access token.
    ///
    /// Loads the token file and probes the access token with `GET /me`. When
    /// Spotify rejects the token, one refresh is attempted and the refreshed
    /// record is written back to the token file. The file is not touched on
    /// the happy path.
    ///
    /// # Errors
    ///
    /// - [`AppError::Storage`] when the token file is missing or unreadable
    /// - [`AppError::Auth`] when the refresh is rejected or the refreshed
    ///   token is rejected again
    /// - [`AppError::Upstream`] when the probe fails for another reason
    pub async fn ensure_authenticated(&self) -> Result<Session, AppError> {
        let _guard = self.lock.lock().await;
        let record = self.store.load().await?;

        match self.client.get_me(&record.access_token).await {
            Ok(user) => Ok(Session {
                access_token: record.access_token,
                user_id: user.id,
            }),
            Err(ApiError::Unauthorized(reason)) => {
                warning!("Access token rejected ({}), refreshing", reason);
                let record = self.refresh(record).await?;
                let user = self
                    .client
                    .get_me(&record.access_token)
                    .await
                    .map_err(|e| AppError::Auth(format!("refreshed token rejected: {e}")))?;

                Ok(Session {
                    access_token: record.access_token,
                    user_id: user.id,
                })
            }
            Err(e) => Err(AppError::Upstream(e)),
        }
    }

    async fn refresh(&self, record: TokenRecord) -> Result<TokenRecord, AppError> {
        let response = self
            .client
            .refresh_access_token(&record.refresh_token)
            .await
            .map_err(|e| AppError::Auth(format!("token refresh failed: {e}")))?;

        let refreshed = record.refreshed(response);
        self.store.persist(&refreshed).await?;
        Ok(refreshed)
    }
}
