use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    pub fn expires_at(&self) -> DateTime<Utc> {
        let expiry = self.obtained_at.saturating_add(self.expires_in);
        DateTime::from_timestamp(expiry as i64, 0).unwrap_or_else(Utc::now)
    }
}

/// An owned access token handed to exactly one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Credential valid for the next hour. Mostly useful for tests and
    /// tokens passed in from the command line.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self::new(access_token, Utc::now() + Duration::hours(1))
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Opaque track identifier accepted by add operations (a Spotify URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRef(String);

impl TrackRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of playlist items as returned by the API.
///
/// `raw_len` counts every item on the page, including local files and removed
/// tracks that have no addable reference and are absent from `tracks`. Only a
/// page with `raw_len == 0` marks the end of the playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPage {
    pub tracks: Vec<TrackRef>,
    pub raw_len: usize,
}

impl TrackPage {
    pub fn is_end(&self) -> bool {
        self.raw_len == 0
    }

    pub fn skipped(&self) -> usize {
        self.raw_len.saturating_sub(self.tracks.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverImage {
    Url(String),
    Bytes(Vec<u8>),
}

/// Point-in-time read of a playlist. Not kept in sync with later edits.
#[derive(Debug, Clone)]
pub struct PlaylistSnapshot {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub tracks: Vec<TrackRef>,
    pub cover: Option<CoverImage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    pub id: String,
    pub share_url: Option<String>,
}

/// Position of a job in its state machine.
///
/// Variants are declared in pipeline order; `Failed` sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    FetchingSource,
    ShufflingOrder,
    CreatingDestination,
    CloningArtwork,
    WritingTracks,
    Done,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// Every non-terminal state may fail. `CloningArtwork` is optional, so
    /// `CreatingDestination` may go straight to `WritingTracks`.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;

        if self.is_terminal() {
            return false;
        }
        if next == Failed {
            return true;
        }

        matches!(
            (self, next),
            (Pending, FetchingSource)
                | (FetchingSource, ShufflingOrder)
                | (ShufflingOrder, CreatingDestination)
                | (CreatingDestination, CloningArtwork)
                | (CreatingDestination, WritingTracks)
                | (CloningArtwork, WritingTracks)
                | (WritingTracks, Done)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::FetchingSource => "fetching_source",
            JobStatus::ShufflingOrder => "shuffling_order",
            JobStatus::CreatingDestination => "creating_destination",
            JobStatus::CloningArtwork => "cloning_artwork",
            JobStatus::WritingTracks => "writing_tracks",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub count: usize,
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub timestamp: DateTime<Utc>,
    pub stage: JobStatus,
    pub level: EventLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
}

impl ProgressEvent {
    pub fn new(stage: JobStatus, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            stage,
            level: EventLevel::Info,
            message: message.into(),
            progress: None,
        }
    }

    pub fn with_level(mut self, level: EventLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_progress(mut self, count: usize, total: Option<usize>) -> Self {
        self.progress = Some(Progress { count, total });
        self
    }
}

/// Final report of a job, returned by the synchronous endpoint and sent as
/// the last line of a progress stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub source_playlist_id: String,
    pub status: JobStatus,
    pub destination_playlist_id: Option<String>,
    pub share_url: Option<String>,
    pub tracks: usize,
    pub batches_written: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyErrorResponse {
    pub error: SpotifyErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPlaylistResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: PlaylistOwner,
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemsResponse {
    pub items: Vec<PlaylistItem>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemTrack {
    pub uri: Option<String>,
    #[serde(default)]
    pub is_local: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
