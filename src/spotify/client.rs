use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::ApiError,
    spotify::SpotifyClient,
    types::{
        AddTrackToPlaylistRequest, CreatePlaylistRequest, CreatePlaylistResponse, Page, Playlist,
        PlaylistItem, PlaylistOwner, RemoveTracksRequest, SearchResponse, SnapshotResponse,
        TokenResponse, Track, TrackUri, User,
    },
    utils,
};

const PLAYLIST_DESCRIPTION: &str = "Created by songlist";

/// [`SpotifyClient`] backed by the Spotify Web API over HTTPS.
///
/// The underlying `reqwest::Client` is shared by all requests; it keeps a
/// connection pool but no credentials.
#[derive(Clone)]
pub struct HttpSpotify {
    http: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl HttpSpotify {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        utils::api_endpoint(&self.api_url, segments)
    }

    async fn token_grant(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
        let request = self
            .http
            .post(&self.token_url)
            .header(
                "Authorization",
                utils::basic_auth_header(&self.client_id, &self.client_secret),
            )
            .form(form);

        send(request).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = check(request.send().await?).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = utils::api_error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Unauthorized(message))
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SpotifyClient for HttpSpotify {
    async fn get_me(&self, token: &str) -> Result<User, ApiError> {
        send(self.http.get(self.url(&["me"])?).bearer_auth(token)).await
    }

    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        let limit = limit.to_string();
        let request = self
            .http
            .get(self.url(&["search"])?)
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())]);

        let response: SearchResponse = send(request).await?;
        Ok(response
            .tracks
            .map(|page| page.items.into_iter().flatten().collect())
            .unwrap_or_default())
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<Playlist, ApiError> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: PLAYLIST_DESCRIPTION.to_string(),
            public,
            collaborative: false,
        };
        let request = self
            .http
            .post(self.url(&["users", user_id, "playlists"])?)
            .bearer_auth(token)
            .json(&body);

        let created: CreatePlaylistResponse = send(request).await?;
        Ok(Playlist {
            id: created.id,
            name: created.name,
            owner: PlaylistOwner {
                id: user_id.to_string(),
            },
        })
    }

    async fn add_tracks_to_playlist(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ApiError> {
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let request = self
            .http
            .post(self.url(&["playlists", playlist_id, "tracks"])?)
            .bearer_auth(token)
            .json(&body);

        let snapshot: SnapshotResponse = send(request).await?;
        Ok(snapshot.snapshot_id)
    }

    async fn get_user_playlists(&self, token: &str) -> Result<Vec<Playlist>, ApiError> {
        let page: Page<Option<Playlist>> =
            send(self.http.get(self.url(&["me", "playlists"])?).bearer_auth(token)).await?;
        Ok(page.items.into_iter().flatten().collect())
    }

    async fn get_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>, ApiError> {
        let request = self
            .http
            .get(self.url(&["playlists", playlist_id, "tracks"])?)
            .bearer_auth(token)
            .query(&[("fields", "items(track(id,uri))")]);

        let page: Page<PlaylistItem> = send(request).await?;
        Ok(page.items)
    }

    async fn remove_tracks_from_playlist(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String, ApiError> {
        let body = RemoveTracksRequest {
            tracks: uris.iter().map(|uri| TrackUri { uri: uri.clone() }).collect(),
        };
        let request = self
            .http
            .delete(self.url(&["playlists", playlist_id, "tracks"])?)
            .bearer_auth(token)
            .json(&body);

        let snapshot: SnapshotResponse = send(request).await?;
        Ok(snapshot.snapshot_id)
    }

    async fn unfollow_playlist(&self, token: &str, playlist_id: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .delete(self.url(&["playlists", playlist_id, "followers"])?)
            .bearer_auth(token);

        check(request.send().await?).await?;
        Ok(())
    }

    async fn authorization_code_grant(&self, code: &str) -> Result<TokenResponse, ApiError> {
        self.token_grant(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        self.token_grant(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }
}
