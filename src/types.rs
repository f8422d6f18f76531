use std::{fmt, str::FromStr};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Token pair persisted in the token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obtained_at: Option<u64>,
}

impl TokenRecord {
    /// Builds a record from a fresh authorization-code grant.
    ///
    /// Returns `None` when the provider did not issue a refresh token.
    pub fn from_grant(response: TokenResponse) -> Option<Self> {
        let refresh_token = response.refresh_token.filter(|t| !t.is_empty())?;
        Some(Self {
            access_token: response.access_token,
            refresh_token,
            expires_in: response.expires_in,
            token_type: response.token_type,
            scope: response.scope,
            obtained_at: Some(Utc::now().timestamp() as u64),
        })
    }

    /// Applies a refresh response to this record.
    ///
    /// A refresh token issued by the provider replaces the stored one,
    /// otherwise the stored refresh token is carried over.
    pub fn refreshed(self, response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or(self.refresh_token),
            expires_in: response.expires_in.or(self.expires_in),
            token_type: response.token_type.or(self.token_type),
            scope: response.scope.or(self.scope),
            obtained_at: Some(Utc::now().timestamp() as u64),
        }
    }

    /// Unix timestamp at which the access token expires, when known.
    pub fn expires_at(&self) -> Option<u64> {
        Some(self.obtained_at? + self.expires_in?)
    }
}

/// Body of a successful token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Request-scoped credential handed to every provider call.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
}

/// Validated create-playlist request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    pub songs: Vec<String>,
    pub name: String,
}

/// Outcome of resolving one requested song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub query: String,
    pub track: Option<Track>,
}

impl ResolvedTrack {
    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().map(|t| t.id.as_str())
    }
}

/// Result of building a playlist, returned to the caller as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResult {
    pub playlist_id: String,
    pub playlist_url: String,
    /// Snapshot id of the last track addition, absent when nothing was added.
    pub added_tracks: Option<String>,
    pub track_count: usize,
    #[serde(default)]
    pub unmatched: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeResult {
    pub count: usize,
    pub message: String,
}

/// Visibility of newly created playlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "public" => Ok(Visibility::Public),
            "false" | "0" | "no" | "private" => Ok(Visibility::Private),
            other => Err(format!("invalid visibility: {other}")),
        }
    }
}

/// How the service obtains credentials for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStrategy {
    /// Long-lived refresh token from the token file.
    #[default]
    Stored,
    /// Authorization-code grant per request, nothing persisted.
    Interactive,
}

impl FromStr for AuthStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stored" => Ok(AuthStrategy::Stored),
            "interactive" => Ok(AuthStrategy::Interactive),
            other => Err(format!("invalid auth strategy: {other}")),
        }
    }
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStrategy::Stored => write!(f, "stored"),
            AuthStrategy::Interactive => write!(f, "interactive"),
        }
    }
}

/// Authorization started by `songlist auth`, completed by the callback.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Page<Option<Track>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
}

impl Playlist {
    /// Whether `user_id` owns the playlist rather than just following it.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner.id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Tabled)]
pub struct ResolvedTableRow {
    pub query: String,
    pub track: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct TokenTableRow {
    pub field: String,
    pub value: String,
}
