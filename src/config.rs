//! Configuration management for the Songlist playlist service.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. All values are read once into an immutable
//! [`Config`] which is then handed to the server and the command-line layer.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the current working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr};

use crate::{error::ConfigError, types::AuthStrategy, types::Visibility};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/callback";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private";

/// Loads environment variables from `.env` files.
///
/// Looks for `songlist/.env` in the platform-specific local data directory
/// first and then for a `.env` in the current working directory. Variables
/// that are already set in the process environment are never overwritten,
/// and a missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/songlist/.env`
/// - macOS: `~/Library/Application Support/songlist/.env`
/// - Windows: `%LOCALAPPDATA%/songlist/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    async_fs::create_dir_all(data_dir())
        .await
        .map_err(|e| ConfigError::Env(e.to_string()))?;

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::Env(e.to_string()))?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Env(e.to_string())),
    }
}

/// Returns the application's data directory (`<data dir>/songlist`).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("songlist");
    path
}

/// Runtime configuration of the service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spotify application client id.
    pub client_id: String,
    /// Spotify application client secret. Never logged.
    pub client_secret: String,
    /// Redirect URI registered with the Spotify application.
    pub redirect_uri: String,
    /// Address the HTTP server binds to, e.g. `127.0.0.1:3000`.
    pub server_address: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    /// Space separated OAuth scopes requested during authorization.
    pub scope: String,
    /// Location of the persisted token record.
    pub token_file: PathBuf,
    /// Visibility of newly created playlists.
    pub visibility: Visibility,
    pub auth_strategy: AuthStrategy,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or a value cannot be parsed.
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_env()?;
    /// println!("listening on {}", config.server_address);
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_address = match env::var("PORT") {
            Ok(port) => with_port(&optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS), &port)?,
            Err(_) => optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
        };

        let token_file = env::var("TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir().join("token.json"));

        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: optional("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            server_address,
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL),
            auth_url: optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            scope: optional("SPOTIFY_SCOPE", DEFAULT_SCOPE),
            token_file,
            visibility: parsed("PLAYLIST_PUBLIC", Visibility::Private)?,
            auth_strategy: parsed("AUTH_STRATEGY", AuthStrategy::Stored)?,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| ConfigError::Invalid { key, value })
        }
        _ => Ok(default),
    }
}

/// Replaces the port of `address` with `port`.
pub fn with_port(address: &str, port: &str) -> Result<String, ConfigError> {
    let port: u16 = port.trim().parse().map_err(|_| ConfigError::Invalid {
        key: "PORT",
        value: port.to_string(),
    })?;
    let host = address.rsplit_once(':').map_or(address, |(host, _)| host);
    Ok(format!("{host}:{port}"))
}
