use std::{sync::Arc, time::Duration};

use reqwest::Url;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    management::TokenStore,
    server::start_auth_server,
    spotify::SpotifyClient,
    success,
    types::{PendingAuthorization, TokenRecord},
    utils, warning,
};

const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the Spotify authorization URL carrying `state`.
///
/// All parameters are query-encoded, so `state` may be arbitrary text such as
/// a JSON-encoded playlist request.
pub fn authorize_url(config: &Config, state: &str) -> Result<String, String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| format!("Invalid authorization url {}: {}", config.auth_url, e))?;

    Ok(url.to_string())
}

/// Provisions the token file through an interactive authorization-code flow.
///
/// 1. Starts a local callback server where the redirect uri points
/// 2. Opens the authorization URL in the user's browser
/// 3. Waits for the callback to deliver the authorization code
/// 4. Exchanges the code and persists the token record
///
/// The random `state` sent to Spotify must come back unchanged, otherwise
/// the callback is rejected.
///
/// # Errors
///
/// Fails when the user denies access, the flow times out, the code exchange
/// is rejected or the token file cannot be written.
pub async fn auth(config: &Config, client: &dyn SpotifyClient) -> Result<TokenRecord, String> {
    let state = utils::generate_state();
    let auth_url = authorize_url(config, &state)?;

    let shared_state = Arc::new(Mutex::new(Some(PendingAuthorization {
        state,
        code: None,
        error: None,
    })));

    let (address, path) = utils::callback_endpoint(&config.redirect_uri)?;
    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_auth_server(address, &path, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let outcome = wait_for_code(shared_state).await;
    server.abort();

    let code = outcome?;
    let response = client
        .authorization_code_grant(&code)
        .await
        .map_err(|e| format!("Token exchange failed: {}", e))?;

    let record = TokenRecord::from_grant(response)
        .ok_or_else(|| "Spotify did not issue a refresh token".to_string())?;

    TokenStore::new(config.token_file.clone())
        .persist(&record)
        .await
        .map_err(|e| format!("Failed to save token: {}", e))?;

    success!("Token saved to {}", config.token_file.display());
    Ok(record)
}

/// Polls the shared state until the callback delivered a code or an error.
async fn wait_for_code(shared_state: Arc<Mutex<Option<PendingAuthorization>>>) -> Result<String, String> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < AUTH_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(pending) = lock.as_ref() {
            if let Some(error) = &pending.error {
                return Err(format!("Authorization failed: {}", error));
            }
            if let Some(code) = &pending.code {
                return Ok(code.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err("Authentication timed out.".to_string())
}
