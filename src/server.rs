use axum::{
    Extension, Router,
    routing::get,
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    Res, api,
    config::Config,
    info,
    management::{AuthManager, TokenStore},
    spotify::{HttpSpotify, SpotifyClient},
    types::{AuthStrategy, PendingAuthorization},
};

/// Shared state of the service router.
///
/// Holds no per-request credential; handlers obtain a session from `auth`
/// (or from the callback's code exchange) for each request.
pub struct AppState {
    pub config: Config,
    pub client: Arc<dyn SpotifyClient>,
    pub auth: AuthManager,
}

impl AppState {
    pub fn new(config: Config, client: Arc<dyn SpotifyClient>) -> Self {
        let auth = AuthManager::new(
            Arc::clone(&client),
            TokenStore::new(config.token_file.clone()),
        );
        AppState {
            config,
            client,
            auth,
        }
    }
}

/// Router of the playlist service.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(api::health))
        .route(
            "/generatePlaylist",
            get(api::generate_playlist).post(api::generate_playlist),
        )
        .route("/clear", get(api::clear));

    if state.config.auth_strategy == AuthStrategy::Interactive {
        app = app.route("/callback", get(api::callback));
    }

    app.layer(Extension(state))
}

pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_address)
        .map_err(|e| format!("Failed to parse server address {}: {}", config.server_address, e))?;

    let client: Arc<dyn SpotifyClient> = Arc::new(HttpSpotify::new(&config));
    let strategy = config.auth_strategy;
    let app = router(Arc::new(AppState::new(config, client)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server is running on http://{} ({} auth)", addr, strategy);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Temporary server receiving the redirect of `songlist auth`.
pub async fn start_auth_server(
    address: SocketAddr,
    callback_path: &str,
    state: Arc<Mutex<Option<PendingAuthorization>>>,
) -> Res<()> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route(callback_path, get(api::authorize_callback).layer(Extension(state)));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
