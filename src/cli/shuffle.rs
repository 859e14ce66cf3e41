use crate::{
    error,
    job::{ConsoleSink, ShuffleJob},
    management::{TokenManager, TokenProvider},
    spotify::SpotifyClient,
    success, utils,
};

pub async fn shuffle(playlist: String) {
    let Some(playlist_id) = utils::parse_playlist_id(&playlist) else {
        error!("'{}' is not a playlist id, URI or link", playlist);
    };

    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run plshuffle auth\n Error: {}",
                e
            );
        }
    };

    let credential = match token_mgr.get_valid_credential().await {
        Ok(credential) => credential,
        Err(e) => error!("{}. Please run plshuffle auth", e),
    };

    let client = match SpotifyClient::new(credential) {
        Ok(client) => client,
        Err(e) => error!("Cannot build HTTP client: {}", e),
    };

    let mut job = match ShuffleJob::new(playlist_id) {
        Ok(job) => job,
        Err(e) => error!("{}", e),
    };

    let mut sink = ConsoleSink::new();
    match job.run(&client, &mut sink).await {
        Ok(summary) => {
            if let Some(url) = summary.share_url {
                success!("Open it at {}", url);
            }
        }
        Err(e) => error!("Shuffle failed: {}", e),
    }
}
