//! Configuration management for the playlist shuffler.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Settings that have a sensible public default (API
//! endpoints, bind address, timeouts) fall back to it; the client id needed for
//! token refresh has none and is reported as missing.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `plshuffle/.env` under the platform-specific
/// local data directory. A missing file is fine: values may come from the
/// process environment alone.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/plshuffle/.env`
/// - macOS: `~/Library/Application Support/plshuffle/.env`
/// - Windows: `%LOCALAPPDATA%/plshuffle/.env`
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or if the
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root of everything the application stores on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("plshuffle");
    path
}

/// Address the HTTP service binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Base URL of the Spotify Web API (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_SPOTIFY_API_URL.to_string())
}

/// Token endpoint used for the refresh-token grant (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL")
        .unwrap_or_else(|_| DEFAULT_SPOTIFY_API_TOKEN_URL.to_string())
}

/// Client id registered with Spotify (`SPOTIFY_API_AUTH_CLIENT_ID`).
///
/// # Errors
///
/// Returns an error naming the variable when it is not set.
pub fn spotify_client_id() -> Result<String, String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .map_err(|_| "SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string())
}

/// Client secret (`SPOTIFY_API_AUTH_CLIENT_SECRET`). Optional: public
/// clients refresh with the client id alone.
pub fn spotify_client_secret() -> Option<String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
}

/// Timeout applied to every outgoing HTTP request (`HTTP_TIMEOUT_SECS`).
pub fn http_timeout() -> Duration {
    let secs = env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Shared reqwest client configured with [`http_timeout`].
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(http_timeout()).build()
}
