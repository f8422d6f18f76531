#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::Mutex,
};

use async_trait::async_trait;
use songlist::{
    config::{self, Config},
    error::ApiError,
    spotify::SpotifyClient,
    types::{
        AuthStrategy, Playlist, PlaylistItem, PlaylistItemTrack, PlaylistOwner, TokenRecord,
        TokenResponse, Track, TrackArtist, User, Visibility,
    },
};

pub const USER_ID: &str = "user-1";
pub const OTHER_USER_ID: &str = "someone-else";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetMe(String),
    Search(String),
    CreatePlaylist { name: String, public: bool },
    AddTracks { playlist_id: String, uris: Vec<String> },
    GetUserPlaylists,
    GetPlaylistTracks(String),
    RemoveTracks { playlist_id: String, uris: Vec<String> },
    Unfollow(String),
    CodeGrant(String),
    Refresh(String),
}

/// In-memory Spotify double recording every call.
#[derive(Default)]
pub struct FakeSpotify {
    pub calls: Mutex<Vec<Call>>,
    valid_tokens: Mutex<HashSet<String>>,
    catalog: HashMap<String, Track>,
    failing_searches: HashSet<String>,
    playlists: Vec<(Playlist, Vec<String>)>,
    failing_unfollow: Option<String>,
    refresh_response: Option<TokenResponse>,
    grant_response: Option<TokenResponse>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_valid_token(self, token: &str) -> Self {
        self.valid_tokens.lock().unwrap().insert(token.to_string());
        self
    }

    pub fn with_track(mut self, query: &str, id: &str) -> Self {
        self.catalog.insert(query.to_string(), track(id));
        self
    }

    pub fn with_failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    pub fn with_playlist(self, id: &str, uris: &[&str]) -> Self {
        self.with_owned_playlist(id, USER_ID, uris)
    }

    /// A playlist the account follows but another user owns.
    pub fn with_foreign_playlist(self, id: &str, uris: &[&str]) -> Self {
        self.with_owned_playlist(id, OTHER_USER_ID, uris)
    }

    fn with_owned_playlist(mut self, id: &str, owner: &str, uris: &[&str]) -> Self {
        self.playlists.push((
            playlist(id, &format!("name of {id}"), owner),
            uris.iter().map(|u| u.to_string()).collect(),
        ));
        self
    }

    pub fn with_failing_unfollow(mut self, id: &str) -> Self {
        self.failing_unfollow = Some(id.to_string());
        self
    }

    pub fn with_refresh(mut self, access_token: &str, refresh_token: Option<&str>) -> Self {
        self.refresh_response = Some(token_response(access_token, refresh_token));
        self
    }

    pub fn with_grant(mut self, access_token: &str, refresh_token: Option<&str>) -> Self {
        self.grant_response = Some(token_response(access_token, refresh_token));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn owner_of(&self, playlist_id: &str) -> Option<String> {
        self.playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .map(|(p, _)| p.owner.id.clone())
    }
}

pub fn playlist(id: &str, name: &str, owner: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        owner: PlaylistOwner {
            id: owner.to_string(),
        },
    }
}

pub fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: format!("track {id}"),
        uri: format!("spotify:track:{id}"),
        artists: vec![TrackArtist {
            name: "Some Artist".to_string(),
        }],
    }
}

fn token_response(access_token: &str, refresh_token: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: access_token.to_string(),
        token_type: Some("Bearer".to_string()),
        scope: Some("playlist-modify-private".to_string()),
        expires_in: Some(3600),
        refresh_token: refresh_token.map(str::to_string),
    }
}

#[async_trait]
impl SpotifyClient for FakeSpotify {
    async fn get_me(&self, token: &str) -> Result<User, ApiError> {
        self.record(Call::GetMe(token.to_string()));
        if self.valid_tokens.lock().unwrap().contains(token) {
            Ok(User {
                id: USER_ID.to_string(),
                display_name: None,
            })
        } else {
            Err(ApiError::Unauthorized("The access token expired".to_string()))
        }
    }

    async fn search_tracks(
        &self,
        _token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        assert_eq!(limit, 1);
        self.record(Call::Search(query.to_string()));
        if self.failing_searches.contains(query) {
            return Err(ApiError::Status {
                status: 500,
                message: "search failed".to_string(),
            });
        }
        Ok(self.catalog.get(query).cloned().into_iter().collect())
    }

    async fn create_playlist(
        &self,
        _token: &str,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<Playlist, ApiError> {
        assert_eq!(user_id, USER_ID);
        self.record(Call::CreatePlaylist {
            name: name.to_string(),
            public,
        });
        Ok(playlist("new-playlist", name, user_id))
    }

    async fn add_tracks_to_playlist(
        &self,
        _token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ApiError> {
        self.record(Call::AddTracks {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        let adds = self.count(|c| matches!(c, Call::AddTracks { .. }));
        Ok(format!("snapshot-{adds}"))
    }

    async fn get_user_playlists(&self, _token: &str) -> Result<Vec<Playlist>, ApiError> {
        self.record(Call::GetUserPlaylists);
        Ok(self.playlists.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn get_playlist_tracks(
        &self,
        _token: &str,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ApiError> {
        self.record(Call::GetPlaylistTracks(playlist_id.to_string()));
        let uris = self
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist_id)
            .map(|(_, uris)| uris.clone())
            .unwrap_or_default();
        Ok(uris
            .into_iter()
            .map(|uri| PlaylistItem {
                track: Some(PlaylistItemTrack {
                    id: None,
                    uri: Some(uri),
                }),
            })
            .collect())
    }

    async fn remove_tracks_from_playlist(
        &self,
        _token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ApiError> {
        self.record(Call::RemoveTracks {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        if self.owner_of(playlist_id).as_deref() != Some(USER_ID) {
            return Err(ApiError::Status {
                status: 403,
                message: "You cannot remove tracks from a playlist you don't own.".to_string(),
            });
        }
        Ok("removed".to_string())
    }

    async fn unfollow_playlist(&self, _token: &str, playlist_id: &str) -> Result<(), ApiError> {
        self.record(Call::Unfollow(playlist_id.to_string()));
        if self.failing_unfollow.as_deref() == Some(playlist_id) {
            return Err(ApiError::Status {
                status: 429,
                message: "API rate limit exceeded".to_string(),
            });
        }
        Ok(())
    }

    async fn authorization_code_grant(&self, code: &str) -> Result<TokenResponse, ApiError> {
        self.record(Call::CodeGrant(code.to_string()));
        match &self.grant_response {
            Some(response) => {
                self.valid_tokens
                    .lock()
                    .unwrap()
                    .insert(response.access_token.clone());
                Ok(response.clone())
            }
            None => Err(ApiError::Status {
                status: 400,
                message: "invalid_grant: Invalid authorization code".to_string(),
            }),
        }
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        self.record(Call::Refresh(refresh_token.to_string()));
        match &self.refresh_response {
            Some(response) => {
                self.valid_tokens
                    .lock()
                    .unwrap()
                    .insert(response.access_token.clone());
                Ok(response.clone())
            }
            None => Err(ApiError::Status {
                status: 400,
                message: "invalid_grant: Refresh token revoked".to_string(),
            }),
        }
    }
}

pub fn record(access_token: &str, refresh_token: &str) -> TokenRecord {
    TokenRecord {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        expires_in: Some(3600),
        token_type: Some("Bearer".to_string()),
        scope: None,
        obtained_at: Some(1_700_000_000),
    }
}

pub fn test_config(token_file: PathBuf) -> Config {
    Config {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: config::DEFAULT_REDIRECT_URI.to_string(),
        server_address: config::DEFAULT_SERVER_ADDRESS.to_string(),
        api_url: config::DEFAULT_API_URL.to_string(),
        auth_url: config::DEFAULT_AUTH_URL.to_string(),
        token_url: config::DEFAULT_TOKEN_URL.to_string(),
        scope: config::DEFAULT_SCOPE.to_string(),
        token_file,
        visibility: Visibility::Private,
        auth_strategy: AuthStrategy::Stored,
    }
}
