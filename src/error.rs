//! Error types for remote calls and shuffle jobs.
//!
//! Three layers are kept apart:
//!
//! - [`ApiError`] is what any single Spotify call can fail with.
//! - [`ShuffleError`] is the terminal error of a job. Remote failures are
//!   wrapped according to the stage they happened in.
//! - [`ImageCloneError`] never terminates a job; it is reported as a
//!   warning and the pipeline carries on writing tracks.

use thiserror::Error;

/// Failure of a single remote call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("Spotify API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Transport or decoding failure inside reqwest.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// Terminal error of a shuffle job.
#[derive(Error, Debug)]
pub enum ShuffleError {
    /// No usable credential; the job never starts.
    #[error("Authentication required: {0}")]
    Auth(String),

    #[error("A source playlist id is required")]
    MissingPlaylistId,

    /// The source playlist has nothing to shuffle. No destination is created.
    #[error("Playlist {0} has no tracks to shuffle")]
    EmptySource(String),

    #[error("Job {0} has already been started")]
    AlreadyStarted(String),

    #[error("Failed to fetch source playlist: {0}")]
    Fetch(#[source] ApiError),

    #[error("Failed to create destination playlist: {0}")]
    Create(#[source] ApiError),

    /// A batch write failed. Earlier batches stay in the destination.
    #[error("Failed to write batch {batch} to playlist {playlist_id}: {source}")]
    Write {
        playlist_id: String,
        batch: usize,
        #[source]
        source: ApiError,
    },
}

impl ShuffleError {
    /// Returns true for errors caused by the request itself rather than
    /// by the remote service.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ShuffleError::MissingPlaylistId | ShuffleError::EmptySource(_)
        )
    }

    /// The wrapped remote failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ShuffleError::Fetch(e) | ShuffleError::Create(e) => Some(e),
            ShuffleError::Write { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Short machine-readable tag used in HTTP responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ShuffleError::Auth(_) => "auth",
            ShuffleError::MissingPlaylistId | ShuffleError::EmptySource(_) => "validation",
            ShuffleError::AlreadyStarted(_) => "conflict",
            ShuffleError::Fetch(_) => "fetch",
            ShuffleError::Create(_) => "create",
            ShuffleError::Write { .. } => "write",
        }
    }
}

/// Failure while copying the cover image. Never fatal for a job.
#[derive(Error, Debug)]
pub enum ImageCloneError {
    #[error("Failed to download cover image: {0}")]
    Download(#[source] ApiError),

    #[error("Cover image is {size} bytes once encoded, above the {limit} byte upload limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Failed to upload cover image: {0}")]
    Upload(#[source] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flagged() {
        assert!(ShuffleError::MissingPlaylistId.is_validation());
        assert!(ShuffleError::EmptySource("abc".into()).is_validation());
        assert!(!ShuffleError::Auth("expired".into()).is_validation());
    }

    #[test]
    fn write_error_exposes_status() {
        let err = ShuffleError::Write {
            playlist_id: "dest".into(),
            batch: 2,
            source: ApiError::Status {
                status: 500,
                message: "boom".into(),
            },
        };

        assert_eq!(err.kind(), "write");
        assert_eq!(err.api_error().and_then(|e| e.status()), Some(500));
        assert!(err.to_string().contains("batch 2"));
    }
}
