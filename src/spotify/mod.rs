//! # Spotify Integration Module
//!
//! This module is the integration layer between the shuffle pipeline and the
//! Spotify Web API. The pipeline only ever talks to the [`RemoteLibrary`]
//! trait; [`SpotifyClient`] is the production implementation over reqwest and
//! test code substitutes scripted doubles.
//!
//! ## Architecture
//!
//! ```text
//! Job pipeline (job::ShuffleJob)
//!          ↓
//! RemoteLibrary trait
//!          ↓
//! SpotifyClient (reqwest, JSON, bearer credential)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}` - playlist metadata, owner and cover images
//! - `GET /playlists/{id}/tracks` - one page of playlist items
//! - `GET /me` - id of the authenticated user
//! - `POST /users/{user_id}/playlists` - create the destination playlist
//! - `PUT /playlists/{id}/images` - upload a base64 JPEG cover
//! - `POST /playlists/{id}/tracks` - append up to 100 track URIs
//! - `POST /api/token` - refresh-token grant ([`auth`])
//!
//! ## Error Handling
//!
//! Every call returns [`ApiError`]: either the status code and message the
//! API answered with, or the underlying reqwest failure. Nothing here retries;
//! a failed call is reported to the caller as-is.
//!
//! ## Credentials
//!
//! A [`SpotifyClient`] owns the [`Credential`](crate::types::Credential) it was
//! built with and never refreshes it. Obtaining a fresh credential is the job
//! of [`TokenProvider`](crate::management::TokenProvider) before a client is
//! constructed.

pub mod auth;
mod client;

use async_trait::async_trait;

pub use client::SpotifyClient;

use crate::{
    error::ApiError,
    types::{CreatedPlaylist, PlaylistSnapshot, TrackPage, TrackRef},
};

/// Maximum number of playlist items returned by one page request.
pub const PAGE_LIMIT: usize = 100;

/// Maximum number of track URIs accepted by one add request.
pub const BATCH_LIMIT: usize = 100;

/// Maximum size, in bytes, of the base64 payload accepted for a cover upload.
pub const COVER_UPLOAD_LIMIT: usize = 256 * 1024;

/// Operations the shuffle pipeline needs from the remote service.
#[async_trait]
pub trait RemoteLibrary: Send + Sync {
    /// Playlist metadata. The returned snapshot has an empty track list;
    /// tracks are read page by page with [`list_playlist_items`](Self::list_playlist_items).
    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistSnapshot, ApiError>;

    /// One page of playlist items. Items without an addable reference are
    /// left out of [`TrackPage::tracks`] but still counted in `raw_len`.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<TrackPage, ApiError>;

    async fn current_user_id(&self) -> Result<String, ApiError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<CreatedPlaylist, ApiError>;

    /// Plain unauthenticated download of an image URL.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError>;

    async fn upload_cover_image(&self, playlist_id: &str, base64_jpeg: &str)
    -> Result<(), ApiError>;

    async fn add_items(&self, playlist_id: &str, tracks: &[TrackRef]) -> Result<(), ApiError>;
}
