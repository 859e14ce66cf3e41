use async_trait::async_trait;
use reqwest::{Client, Response, header::CONTENT_TYPE};

use crate::{
    config,
    error::ApiError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CoverImage, CreatePlaylistRequest,
        CreatePlaylistResponse, CreatedPlaylist, Credential, CurrentUserResponse,
        GetPlaylistResponse, PlaylistItemsResponse, PlaylistSnapshot, SpotifyErrorResponse,
        TrackPage, TrackRef,
    },
};

use super::RemoteLibrary;

/// reqwest-backed [`RemoteLibrary`] bound to one credential.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    credential: Credential,
}

impl SpotifyClient {
    /// Builds a client from the configured API URL and timeout.
    pub fn new(credential: Credential) -> Result<Self, ApiError> {
        let http = config::http_client()?;
        Ok(Self::with_http(http, config::spotify_apiurl(), credential))
    }

    pub fn with_http(http: Client, api_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credential,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

/// Turns a non-success response into [`ApiError::Status`], preferring the
/// message from Spotify's error envelope over the raw body.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<SpotifyErrorResponse>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteLibrary for SpotifyClient {
    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistSnapshot, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/playlists/{}", playlist_id)))
            .query(&[("fields", "id,name,description,owner(id),images")])
            .bearer_auth(&self.credential.access_token)
            .send()
            .await?;

        let playlist = check(response).await?.json::<GetPlaylistResponse>().await?;

        let cover = playlist
            .images
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|image| CoverImage::Url(image.url));

        Ok(PlaylistSnapshot {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description.unwrap_or_default(),
            owner_id: playlist.owner.id,
            tracks: Vec::new(),
            cover,
        })
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<TrackPage, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .query(&[
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
                ("fields", "items(track(uri,is_local)),total".to_string()),
            ])
            .bearer_auth(&self.credential.access_token)
            .send()
            .await?;

        let page = check(response)
            .await?
            .json::<PlaylistItemsResponse>()
            .await?;

        let raw_len = page.items.len();

        // local files and removed tracks have no URI the add endpoint accepts
        let tracks = page
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .filter(|track| !track.is_local)
            .filter_map(|track| track.uri)
            .map(TrackRef::new)
            .collect();

        Ok(TrackPage { tracks, raw_len })
    }

    async fn current_user_id(&self) -> Result<String, ApiError> {
        let response = self
            .http
            .get(self.url("/me"))
            .bearer_auth(&self.credential.access_token)
            .send()
            .await?;

        let user = check(response).await?.json::<CurrentUserResponse>().await?;
        Ok(user.id)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<CreatedPlaylist, ApiError> {
        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };

        let response = self
            .http
            .post(self.url(&format!("/users/{}/playlists", user_id)))
            .bearer_auth(&self.credential.access_token)
            .json(&request)
            .send()
            .await?;

        let created = check(response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await?;

        Ok(CreatedPlaylist {
            id: created.id,
            share_url: created.external_urls.and_then(|urls| urls.spotify),
        })
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;
        let bytes = check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn upload_cover_image(
        &self,
        playlist_id: &str,
        base64_jpeg: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.url(&format!("/playlists/{}/images", playlist_id)))
            .bearer_auth(&self.credential.access_token)
            .header(CONTENT_TYPE, "image/jpeg")
            .body(base64_jpeg.to_string())
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn add_items(&self, playlist_id: &str, tracks: &[TrackRef]) -> Result<(), ApiError> {
        let request = AddTrackToPlaylistRequest {
            uris: tracks.iter().map(|t| t.as_str().to_string()).collect(),
        };

        let response = self
            .http
            .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .bearer_auth(&self.credential.access_token)
            .json(&request)
            .send()
            .await?;

        check(response)
            .await?
            .json::<AddTrackToPlaylistResponse>()
            .await?;
        Ok(())
    }
}
