//! # Spotify Integration Module
//!
//! This module is the integration layer between Songlist and the Spotify Web
//! API. It defines the [`SpotifyClient`] trait, the set of provider calls the
//! service relies on, and [`HttpSpotify`], its `reqwest` implementation.
//!
//! ## Architecture
//!
//! ```text
//! HTTP Boundary / CLI
//!          ↓
//! Playlist operations (resolve, build, purge)
//!          ↓
//! SpotifyClient trait
//!     ├── Web API calls (user, search, playlists)
//!     └── Token endpoint (authorization code, refresh)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Credentials
//!
//! The client holds no access token. Every Web API method takes the bearer
//! token of the current request explicitly, so two requests never share a
//! mutable credential. Only the application's client id and secret live in
//! the client, and they are used for the token endpoint alone.
//!
//! ## API Coverage
//!
//! - `GET /me` - Current user, used as the authentication probe
//! - `GET /search` - Track search, always `type=track`
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - Add tracks
//! - `GET /me/playlists` - Playlists of the current user (first page)
//! - `GET /playlists/{playlist_id}/tracks` - Tracks of a playlist (first page)
//! - `DELETE /playlists/{playlist_id}/tracks` - Remove tracks
//! - `DELETE /playlists/{playlist_id}/followers` - Unfollow a playlist
//! - `POST /api/token` - Authorization-code and refresh-token grants
//!
//! ## Error Handling
//!
//! Every call returns [`crate::error::ApiError`]. A `401` is reported as
//! [`ApiError::Unauthorized`](crate::error::ApiError::Unauthorized) so the
//! authentication layer can tell a rejected token from other failures. There
//! is no retry or rate-limit handling at this level.

pub mod auth;
mod client;

use async_trait::async_trait;

use crate::{
    error::ApiError,
    types::{Playlist, PlaylistItem, Track, TokenResponse, User},
};

pub use client::HttpSpotify;

/// The Spotify calls used by the service.
#[async_trait]
pub trait SpotifyClient: Send + Sync {
    /// Profile of the user owning `token`.
    async fn get_me(&self, token: &str) -> Result<User, ApiError>;

    /// Searches tracks matching `query`, returning at most `limit` results.
    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError>;

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<Playlist, ApiError>;

    /// Appends `uris` to the playlist and returns the new snapshot id.
    async fn add_tracks_to_playlist(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ApiError>;

    async fn get_user_playlists(&self, token: &str) -> Result<Vec<Playlist>, ApiError>;

    async fn get_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ApiError>;

    async fn remove_tracks_from_playlist(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ApiError>;

    async fn unfollow_playlist(&self, token: &str, playlist_id: &str) -> Result<(), ApiError>;

    /// Exchanges an authorization code for a token pair.
    async fn authorization_code_grant(&self, code: &str) -> Result<TokenResponse, ApiError>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError>;
}
