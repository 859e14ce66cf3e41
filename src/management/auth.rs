use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    error::ShuffleError,
    spotify::auth::{RefreshSettings, refresh_token},
    types::{Credential, Token},
};

/// Seconds before nominal expiry at which a token is already treated as
/// expired, so a credential handed to a job does not lapse mid-run.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Source of valid credentials for new jobs.
#[async_trait]
pub trait TokenProvider: Send {
    /// Returns an unexpired credential, refreshing first if needed.
    ///
    /// # Errors
    ///
    /// [`ShuffleError::Auth`] when no token is available or the refresh
    /// fails; the caller has to re-authenticate.
    async fn get_valid_credential(&mut self) -> Result<Credential, ShuffleError>;
}

pub struct TokenManager {
    token: Token,
    settings: Option<RefreshSettings>,
    http: Client,
    cache_path: Option<PathBuf>,
}

impl TokenManager {
    /// In-memory manager. Refreshed tokens are not written anywhere until
    /// [`persist`](Self::persist) is called.
    pub fn new(token: Token, settings: Option<RefreshSettings>) -> Self {
        TokenManager {
            token,
            settings,
            http: Client::new(),
            cache_path: None,
        }
    }

    /// Loads the cached token. Refreshed tokens are written back to the cache.
    pub async fn load() -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        let http = config::http_client().map_err(|e| e.to_string())?;

        Ok(Self {
            token,
            settings: RefreshSettings::from_env().ok(),
            http,
            cache_path: Some(path),
        })
    }

    pub fn with_http(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = self.cache_path.clone().unwrap_or_else(Self::token_path);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| e.to_string())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    /// Replaces the held token using the refresh-token grant.
    ///
    /// On failure the held access token is cleared, so the session has no
    /// credential until a later refresh succeeds.
    pub async fn refresh(&mut self) -> Result<(), ShuffleError> {
        let token = match self.request_refresh().await {
            Ok(token) => token,
            Err(e) => {
                self.token.access_token.clear();
                return Err(e);
            }
        };
        self.token = token;

        if self.cache_path.is_some() {
            if let Err(e) = self.persist().await {
                tracing::warn!("Failed to persist refreshed token: {}", e);
            }
        }
        Ok(())
    }

    async fn request_refresh(&self) -> Result<Token, ShuffleError> {
        let settings = self.settings.as_ref().ok_or_else(|| {
            ShuffleError::Auth("token expired and no client id is configured".to_string())
        })?;

        if self.token.refresh_token.is_empty() {
            return Err(ShuffleError::Auth(
                "token expired and no refresh token is available".to_string(),
            ));
        }

        refresh_token(&self.http, settings, &self.token.refresh_token)
            .await
            .map_err(|e| ShuffleError::Auth(format!("token refresh failed: {}", e)))
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}

#[async_trait]
impl TokenProvider for TokenManager {
    async fn get_valid_credential(&mut self) -> Result<Credential, ShuffleError> {
        if self.is_expired() {
            self.refresh().await?;
        }

        if self.token.access_token.is_empty() {
            return Err(ShuffleError::Auth("no access token available".to_string()));
        }

        Ok(Credential::new(
            self.token.access_token.clone(),
            self.token.expires_at(),
        ))
    }
}
