use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    error::ApiError,
    types::{SpotifyErrorResponse, Token, TokenResponse},
};

/// Where and as whom refresh-token grants are sent.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl RefreshSettings {
    /// Reads the token endpoint and client credentials from the environment.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            token_url: config::spotify_apitoken_url(),
            client_id: config::spotify_client_id()?,
            client_secret: config::spotify_client_secret(),
        })
    }
}

/// Exchanges a refresh token for a new access token.
///
/// Confidential clients authenticate with HTTP basic auth; public clients
/// send their client id in the form body. Spotify does not always rotate the
/// refresh token, so the previous one is kept when the response omits it.
///
/// # Errors
///
/// Returns [`ApiError::Status`] when the token endpoint rejects the grant
/// (revoked or malformed refresh token, unknown client) and
/// [`ApiError::Http`] for transport failures.
pub async fn refresh_token(
    http: &Client,
    settings: &RefreshSettings,
    refresh_token: &str,
) -> Result<Token, ApiError> {
    let mut form = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];

    let mut request = http.post(&settings.token_url);
    match &settings.client_secret {
        Some(secret) => {
            request = request.basic_auth(&settings.client_id, Some(secret));
        }
        None => form.push(("client_id", settings.client_id.as_str())),
    }

    let response = request.form(&form).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<SpotifyErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let json = response.json::<TokenResponse>().await?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token: json
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string()),
        scope: json.scope.unwrap_or_default(),
        expires_in: json.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
