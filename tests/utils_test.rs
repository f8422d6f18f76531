use base64::{Engine, engine::general_purpose::STANDARD};
use songlist::config::with_port;
use songlist::types::{AuthStrategy, TokenRecord, TokenResponse, Visibility};
use songlist::utils::*;

fn response(access_token: &str, refresh_token: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: access_token.to_string(),
        token_type: Some("Bearer".to_string()),
        scope: None,
        expires_in: Some(3600),
        refresh_token: refresh_token.map(str::to_string),
    }
}

fn stored_record() -> TokenRecord {
    TokenRecord {
        access_token: "old-access".to_string(),
        refresh_token: "old-refresh".to_string(),
        expires_in: Some(3600),
        token_type: Some("Bearer".to_string()),
        scope: Some("playlist-modify-private".to_string()),
        obtained_at: Some(1_700_000_000),
    }
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    let state2 = generate_state();
    assert_ne!(state, state2);
}

#[test]
fn test_basic_auth_header() {
    let header = basic_auth_header("my-id", "my-secret");

    assert!(header.starts_with("Basic "));
    let decoded = STANDARD.decode(&header["Basic ".len()..]).unwrap();
    assert_eq!(decoded, b"my-id:my-secret");
}

#[test]
fn test_api_error_message_web_api_shape() {
    let body = r#"{"error":{"status":401,"message":"The access token expired"}}"#;
    assert_eq!(
        api_error_message(body),
        Some("The access token expired".to_string())
    );
}

#[test]
fn test_api_error_message_accounts_shape() {
    let body = r#"{"error":"invalid_grant","error_description":"Refresh token revoked"}"#;
    assert_eq!(
        api_error_message(body),
        Some("invalid_grant: Refresh token revoked".to_string())
    );

    assert_eq!(
        api_error_message(r#"{"error":"invalid_client"}"#),
        Some("invalid_client".to_string())
    );
}

#[test]
fn test_api_error_message_unknown_body() {
    assert_eq!(api_error_message("<html>Bad Gateway</html>"), None);
    assert_eq!(api_error_message(""), None);
    assert_eq!(api_error_message(r#"{"message":"nope"}"#), None);
}

#[test]
fn test_track_uri_and_playlist_url() {
    assert_eq!(track_uri("4uLU6hMCjMI75M1A2tKUQC"), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(
        playlist_url("37i9dQZF1DXcBWIGoYBM5M"),
        "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M"
    );
}

#[test]
fn test_parse_song_list() {
    let songs = parse_song_list(" Imagine Dragons Believer, ,Queen Bohemian Rhapsody,,");
    assert_eq!(
        songs,
        vec![
            "Imagine Dragons Believer".to_string(),
            "Queen Bohemian Rhapsody".to_string()
        ]
    );

    assert!(parse_song_list("").is_empty());
    assert!(parse_song_list(" , ,").is_empty());
}

#[test]
fn test_remove_duplicates_keeps_first_occurrence() {
    let mut ids = vec![
        "b".to_string(),
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "a".to_string(),
    ];
    remove_duplicates(&mut ids);
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[test]
fn test_refreshed_keeps_stored_refresh_token() {
    let refreshed = stored_record().refreshed(response("new-access", None));

    assert_eq!(refreshed.access_token, "new-access");
    assert_eq!(refreshed.refresh_token, "old-refresh");
    // scope not returned by the refresh is carried over
    assert_eq!(refreshed.scope.as_deref(), Some("playlist-modify-private"));
    assert!(refreshed.obtained_at.unwrap() > 1_700_000_000);
}

#[test]
fn test_refreshed_prefers_issued_refresh_token() {
    let refreshed = stored_record().refreshed(response("new-access", Some("rotated")));
    assert_eq!(refreshed.refresh_token, "rotated");

    let refreshed = stored_record().refreshed(response("new-access", Some("")));
    assert_eq!(refreshed.refresh_token, "old-refresh");
}

#[test]
fn test_from_grant_requires_refresh_token() {
    assert!(TokenRecord::from_grant(response("access", None)).is_none());

    let record = TokenRecord::from_grant(response("access", Some("refresh"))).unwrap();
    assert_eq!(record.access_token, "access");
    assert_eq!(record.refresh_token, "refresh");
    assert_eq!(record.expires_in, Some(3600));
}

#[test]
fn test_expires_at() {
    assert_eq!(stored_record().expires_at(), Some(1_700_003_600));

    let mut record = stored_record();
    record.obtained_at = None;
    assert_eq!(record.expires_at(), None);
}

#[test]
fn test_token_record_minimal_file() {
    let record: TokenRecord =
        serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap();
    assert_eq!(record.access_token, "a");
    assert_eq!(record.refresh_token, "r");
    assert_eq!(record.expires_in, None);
}

#[test]
fn test_visibility_and_strategy_parsing() {
    assert_eq!("true".parse::<Visibility>(), Ok(Visibility::Public));
    assert_eq!("Private".parse::<Visibility>(), Ok(Visibility::Private));
    assert!("maybe".parse::<Visibility>().is_err());

    assert_eq!("interactive".parse::<AuthStrategy>(), Ok(AuthStrategy::Interactive));
    assert_eq!("STORED".parse::<AuthStrategy>(), Ok(AuthStrategy::Stored));
    assert!("oauth".parse::<AuthStrategy>().is_err());
}

#[test]
fn test_with_port() {
    assert_eq!(with_port("127.0.0.1:3000", "8080").unwrap(), "127.0.0.1:8080");
    assert_eq!(with_port("0.0.0.0", "80").unwrap(), "0.0.0.0:80");
    assert!(with_port("127.0.0.1:3000", "not-a-port").is_err());
}

#[test]
fn test_api_endpoint_encodes_segments() {
    let url = api_endpoint("https://api.spotify.com/v1", &["playlists", "a/b c", "tracks"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.spotify.com/v1/playlists/a%2Fb%20c/tracks"
    );

    let url = api_endpoint("https://api.spotify.com/v1/", &["me"]).unwrap();
    assert_eq!(url.as_str(), "https://api.spotify.com/v1/me");

    assert!(api_endpoint("not a url", &["me"]).is_err());
}

#[test]
fn test_callback_endpoint_follows_redirect_uri() {
    let (address, path) = callback_endpoint("http://localhost:8888/spotify/callback").unwrap();
    assert_eq!(address.to_string(), "127.0.0.1:8888");
    assert_eq!(path, "/spotify/callback");

    let (address, path) = callback_endpoint("http://127.0.0.1:3000/callback").unwrap();
    assert_eq!(address.to_string(), "127.0.0.1:3000");
    assert_eq!(path, "/callback");

    let (address, _) = callback_endpoint("https://songlist.example.com/callback").unwrap();
    assert_eq!(address.to_string(), "0.0.0.0:443");

    assert!(callback_endpoint("localhost:3000/callback").is_err());
}
