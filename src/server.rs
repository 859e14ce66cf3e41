use axum::{
    Extension, Router,
    routing::{get, post},
};
use reqwest::Client;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{Res, api, config, management::TokenManager};

/// State shared by all handlers.
///
/// The token manager is the only shared mutable piece; jobs receive owned
/// credentials cloned out of it.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<Mutex<TokenManager>>,
    pub http: Client,
    pub api_url: String,
}

impl AppState {
    pub fn new(tokens: TokenManager, http: Client, api_url: impl Into<String>) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
            http,
            api_url: api_url.into(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/playlists/{id}/shuffle", post(api::shuffle))
        .route(
            "/playlists/{id}/shuffle/background",
            post(api::shuffle_background),
        )
        .route("/playlists/{id}/shuffle/stream", get(api::shuffle_stream))
        .layer(Extension(state))
}

pub async fn start_api_server(state: AppState, address: Option<String>) -> Res<()> {
    let address = address.unwrap_or_else(config::server_addr);
    let addr = SocketAddr::from_str(&address)
        .map_err(|e| format!("Failed to parse server address {}: {}", address, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
