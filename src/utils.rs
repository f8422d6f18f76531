use std::{
    collections::HashSet,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;
use serde_json::Value;

use crate::error::ApiError;

pub const PLAYLIST_URL_BASE: &str = "https://open.spotify.com/playlist";

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// `Authorization` header value for the token endpoint.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

/// Extracts a human readable message from a Spotify error body.
///
/// The Web API answers `{"error": {"status": 401, "message": "..."}}` while
/// the accounts service answers `{"error": "...", "error_description": "..."}`.
pub fn api_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    match &json["error"] {
        Value::Object(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::String(error) => Some(
            json["error_description"]
                .as_str()
                .map(|description| format!("{error}: {description}"))
                .unwrap_or_else(|| error.clone()),
        ),
        _ => None,
    }
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("{PLAYLIST_URL_BASE}/{playlist_id}")
}

/// Splits a comma separated song list, trimming entries and dropping blanks.
pub fn parse_song_list(songs: &str) -> Vec<String> {
    songs
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Removes repeated entries, keeping the first occurrence of each.
pub fn remove_duplicates(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

/// Appends `segments` to the `base` API url, percent-encoding each one.
///
/// Ids coming from Spotify or from the user may contain characters that are
/// not valid in a path segment, `/` included.
///
/// # Example
///
/// ```
/// let url = api_endpoint("https://api.spotify.com/v1", &["playlists", "a/b", "tracks"])?;
/// assert_eq!(url.as_str(), "https://api.spotify.com/v1/playlists/a%2Fb/tracks");
/// ```
pub fn api_endpoint(base: &str, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base url", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Socket address and route path the local callback server has to serve so
/// that Spotify's redirect to `redirect_uri` reaches it.
///
/// `localhost` binds the loopback interface, other host names bind every
/// interface. The port falls back to the scheme's default.
pub fn callback_endpoint(redirect_uri: &str) -> Result<(SocketAddr, String), String> {
    let url = Url::parse(redirect_uri)
        .map_err(|e| format!("Invalid redirect uri {}: {}", redirect_uri, e))?;
    let host = url
        .host_str()
        .ok_or_else(|| format!("Redirect uri {} has no host", redirect_uri))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| format!("Redirect uri {} has no port", redirect_uri))?;

    let ip = match host.trim_matches(['[', ']']).parse::<IpAddr>() {
        Ok(ip) => ip,
        Err(_) if host == "localhost" => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Err(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    };

    Ok((SocketAddr::new(ip, port), url.path().to_string()))
}
