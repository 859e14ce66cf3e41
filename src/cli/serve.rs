use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config, error, management::TokenManager, server};

pub async fn serve(address: Option<String>) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "plshuffle=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run plshuffle auth\n Error: {}",
                e
            );
        }
    };

    let http = match config::http_client() {
        Ok(http) => http,
        Err(e) => error!("Cannot build HTTP client: {}", e),
    };

    let state = server::AppState::new(token_mgr, http, config::spotify_apiurl());
    if let Err(e) = server::start_api_server(state, address).await {
        error!("Server stopped: {}", e);
    }
}
