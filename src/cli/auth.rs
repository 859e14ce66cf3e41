use chrono::Utc;

use crate::{
    error,
    management::{TokenManager, TokenProvider},
    spotify::auth::RefreshSettings,
    success,
    types::Token,
};

/// Seeds the token cache from a refresh token obtained elsewhere.
pub async fn auth(refresh_token: String) {
    let settings = match RefreshSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("{}", e),
    };

    // expired on purpose so the first credential request refreshes it
    let seed = Token {
        access_token: String::new(),
        refresh_token,
        scope: String::new(),
        expires_in: 0,
        obtained_at: Utc::now().timestamp() as u64,
    };

    let mut token_mgr = TokenManager::new(seed, Some(settings));
    if let Err(e) = token_mgr.get_valid_credential().await {
        error!("{}", e);
    }

    if let Err(e) = token_mgr.persist().await {
        error!("Failed to save token to cache: {}", e);
    }

    success!("Authentication successful!");
}
