use plshuffle::{
    error::ShuffleError,
    management::{TokenManager, TokenProvider},
    spotify::auth::{RefreshSettings, refresh_token},
    types::Token,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn expired_token() -> Token {
    Token {
        access_token: "old-access".to_string(),
        refresh_token: "old-refresh".to_string(),
        scope: String::new(),
        expires_in: 3600,
        obtained_at: 0,
    }
}

fn settings(server: &MockServer, secret: Option<&str>) -> RefreshSettings {
    RefreshSettings {
        token_url: format!("{}/api/token", server.uri()),
        client_id: "client".to_string(),
        client_secret: secret.map(str::to_string),
    }
}

#[tokio::test]
async fn expired_token_is_refreshed_before_hand_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .and(body_string_contains("client_id=client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "playlist-modify-private"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = TokenManager::new(expired_token(), Some(settings(&server, None)));
    let credential = manager.get_valid_credential().await.unwrap();

    assert_eq!(credential.access_token, "new-access");
    assert!(!credential.is_expired());
    // Spotify did not rotate the refresh token, so the old one is kept
    assert_eq!(manager.current_token().refresh_token, "old-refresh");

    // a second request uses the refreshed token without another grant
    manager.get_valid_credential().await.unwrap();
}

#[tokio::test]
async fn confidential_client_uses_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "refresh_token": "new-refresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = refresh_token(
        &reqwest::Client::new(),
        &settings(&server, Some("secret")),
        "old-refresh",
    )
    .await
    .unwrap();

    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token, "new-refresh");
}

#[tokio::test]
async fn rejected_refresh_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token revoked"
        })))
        .mount(&server)
        .await;

    let mut manager = TokenManager::new(expired_token(), Some(settings(&server, None)));
    let err = manager.get_valid_credential().await.unwrap_err();

    match err {
        ShuffleError::Auth(message) => assert!(message.contains("invalid_grant")),
        other => panic!("Expected auth error, got {:?}", other),
    }

    // the stale access token is gone and is not handed out on a later call
    assert!(manager.current_token().access_token.is_empty());
    let err = manager.get_valid_credential().await.unwrap_err();
    assert!(matches!(err, ShuffleError::Auth(_)));
}
