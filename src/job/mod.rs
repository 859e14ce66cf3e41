//! # Shuffle Job Pipeline
//!
//! A [`ShuffleJob`] copies one playlist into a new private playlist with the
//! tracks in a uniformly random order. It is a small state machine:
//!
//! ```text
//! Pending → FetchingSource → ShufflingOrder → CreatingDestination
//!         → [CloningArtwork] → WritingTracks → Done
//!
//! any non-terminal state → Failed
//! ```
//!
//! Stages run strictly one after another against a [`RemoteLibrary`]. Every
//! transition, fetched page and written batch is recorded in the job's own
//! log and forwarded to a [`ProgressSink`] chosen by the caller.
//!
//! Failure handling differs per stage:
//!
//! - fetching, creating and writing failures end the job in `Failed`;
//! - a source without tracks ends the job before anything is created;
//! - a cover image that cannot be copied is reported as a warning and the
//!   job carries on with the tracks;
//! - a batch failure leaves the batches already written in the destination.
//!
//! Nothing is retried and nothing is rolled back.

mod artwork;
mod batch;
mod pagination;
pub mod sink;

#[cfg(test)]
pub(crate) mod testing;

use rand::seq::SliceRandom;

pub use artwork::clone_cover;
pub use batch::{batch_ranges, write_batches};
pub use pagination::fetch_all_tracks;
pub use sink::{ChannelSink, ConsoleSink, LogSink, ProgressSink};

use crate::{
    error::ShuffleError,
    spotify::{BATCH_LIMIT, PAGE_LIMIT, RemoteLibrary},
    types::{EventLevel, JobStatus, JobSummary, PlaylistSnapshot, ProgressEvent, TrackRef},
    utils,
};

/// Uniform in-place permutation of the track order.
pub fn shuffle_tracks(tracks: &mut [TrackRef]) {
    tracks.shuffle(&mut rand::rng());
}

/// One randomization run. Mutated only by its own [`run`](Self::run).
#[derive(Debug, Clone)]
pub struct ShuffleJob {
    id: String,
    source_playlist_id: String,
    status: JobStatus,
    destination_playlist_id: Option<String>,
    share_url: Option<String>,
    source: Option<PlaylistSnapshot>,
    tracks: usize,
    batches_written: usize,
    log: Vec<ProgressEvent>,
    failed_stage: Option<JobStatus>,
    error: Option<String>,
}

impl ShuffleJob {
    /// Accepts a randomization request for `source_playlist_id`.
    ///
    /// # Errors
    ///
    /// [`ShuffleError::MissingPlaylistId`] for an empty or blank id.
    pub fn new(source_playlist_id: impl Into<String>) -> Result<Self, ShuffleError> {
        let source_playlist_id = source_playlist_id.into().trim().to_string();
        if source_playlist_id.is_empty() {
            return Err(ShuffleError::MissingPlaylistId);
        }

        Ok(Self {
            id: utils::generate_job_id(),
            source_playlist_id,
            status: JobStatus::Pending,
            destination_playlist_id: None,
            share_url: None,
            source: None,
            tracks: 0,
            batches_written: 0,
            log: Vec::new(),
            failed_stage: None,
            error: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_playlist_id(&self) -> &str {
        &self.source_playlist_id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn destination_playlist_id(&self) -> Option<&str> {
        self.destination_playlist_id.as_deref()
    }

    /// The source playlist as read by the fetch stage, tracks in playlist
    /// order. `None` until that stage has read every page.
    pub fn source(&self) -> Option<&PlaylistSnapshot> {
        self.source.as_ref()
    }

    pub fn log(&self) -> &[ProgressEvent] {
        &self.log
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            job_id: self.id.clone(),
            source_playlist_id: self.source_playlist_id.clone(),
            status: self.status,
            destination_playlist_id: self.destination_playlist_id.clone(),
            share_url: self.share_url.clone(),
            tracks: self.tracks,
            batches_written: self.batches_written,
            failed_stage: self.failed_stage,
            error: self.error.clone(),
        }
    }

    /// Runs every stage to completion.
    ///
    /// The credential is the one `library` was built with; it is never
    /// refreshed here. On error the job is left in `Failed` with the error
    /// recorded, and the same error is returned.
    ///
    /// # Errors
    ///
    /// - [`ShuffleError::AlreadyStarted`] if the job is not `Pending`
    /// - [`ShuffleError::EmptySource`] if the source has no tracks
    /// - [`ShuffleError::Fetch`], [`ShuffleError::Create`],
    ///   [`ShuffleError::Write`] for remote failures in those stages
    pub async fn run<L, S>(&mut self, library: &L, sink: &mut S) -> Result<JobSummary, ShuffleError>
    where
        L: RemoteLibrary + ?Sized,
        S: ProgressSink + ?Sized,
    {
        if self.status != JobStatus::Pending {
            return Err(ShuffleError::AlreadyStarted(self.id.clone()));
        }

        match self.execute(library, sink).await {
            Ok(()) => {
                let message = format!(
                    "Shuffled {} tracks into playlist {}",
                    self.tracks,
                    self.destination_playlist_id.as_deref().unwrap_or_default()
                );
                self.advance(sink, JobStatus::Done, message);
                Ok(self.summary())
            }
            Err(err) => {
                self.fail(sink, &err);
                Err(err)
            }
        }
    }

    async fn execute<L, S>(&mut self, library: &L, sink: &mut S) -> Result<(), ShuffleError>
    where
        L: RemoteLibrary + ?Sized,
        S: ProgressSink + ?Sized,
    {
        let source_id = self.source_playlist_id.clone();

        self.advance(
            sink,
            JobStatus::FetchingSource,
            format!("Fetching playlist {}", source_id),
        );
        let mut snapshot = library
            .get_playlist(&source_id)
            .await
            .map_err(ShuffleError::Fetch)?;

        snapshot.tracks = fetch_all_tracks(library, &source_id, PAGE_LIMIT, |count| {
            self.record(
                &mut *sink,
                ProgressEvent::new(JobStatus::FetchingSource, format!("Fetched {} tracks", count))
                    .with_progress(count, None),
            )
        })
        .await
        .map_err(ShuffleError::Fetch)?;

        let source_name = snapshot.name.clone();
        let cover = snapshot.cover.clone();
        let mut tracks = snapshot.tracks.clone();
        self.source = Some(snapshot);

        if tracks.is_empty() {
            return Err(ShuffleError::EmptySource(source_id));
        }
        self.tracks = tracks.len();

        self.advance(
            sink,
            JobStatus::ShufflingOrder,
            format!("Shuffling {} tracks of '{}'", tracks.len(), source_name),
        );
        shuffle_tracks(&mut tracks);

        let name = utils::shuffled_playlist_name(&source_name);
        self.advance(
            sink,
            JobStatus::CreatingDestination,
            format!("Creating playlist '{}'", name),
        );
        let user_id = library
            .current_user_id()
            .await
            .map_err(ShuffleError::Create)?;
        let created = library
            .create_playlist(
                &user_id,
                &name,
                &utils::shuffled_playlist_description(&source_name),
                false,
            )
            .await
            .map_err(ShuffleError::Create)?;
        let destination_id = created.id.clone();
        self.destination_playlist_id = Some(created.id);
        self.share_url = created.share_url;

        if let Some(cover) = &cover {
            self.advance(sink, JobStatus::CloningArtwork, "Copying cover image");
            match clone_cover(library, &destination_id, cover).await {
                Ok(size) => self.record(
                    sink,
                    ProgressEvent::new(
                        JobStatus::CloningArtwork,
                        format!("Cover image copied ({} bytes)", size),
                    ),
                ),
                Err(e) => self.record(
                    sink,
                    ProgressEvent::new(
                        JobStatus::CloningArtwork,
                        format!("Cover image not copied: {}", e),
                    )
                    .with_level(EventLevel::Warning),
                ),
            }
        }

        self.advance(
            sink,
            JobStatus::WritingTracks,
            format!("Adding {} tracks to playlist {}", tracks.len(), destination_id),
        );
        let batches = write_batches(library, &destination_id, &tracks, BATCH_LIMIT, |done, total| {
            self.batches_written += 1;
            self.record(
                &mut *sink,
                ProgressEvent::new(
                    JobStatus::WritingTracks,
                    format!("Added {} of {} tracks", done, total),
                )
                .with_progress(done, Some(total)),
            )
        })
        .await?;
        self.batches_written = batches;

        Ok(())
    }

    fn advance<S>(&mut self, sink: &mut S, next: JobStatus, message: impl Into<String>)
    where
        S: ProgressSink + ?Sized,
    {
        debug_assert!(
            self.status.can_transition_to(next),
            "invalid transition {} -> {}",
            self.status,
            next
        );
        self.status = next;
        self.record(sink, ProgressEvent::new(next, message));
    }

    fn fail<S>(&mut self, sink: &mut S, err: &ShuffleError)
    where
        S: ProgressSink + ?Sized,
    {
        self.failed_stage = Some(self.status);
        self.error = Some(err.to_string());
        self.status = JobStatus::Failed;

        let mut message = format!("Job failed: {}", err);
        if let (ShuffleError::Write { .. }, Some(dest)) = (err, &self.destination_playlist_id) {
            message.push_str(&format!(
                " (playlist {} keeps the {} batches already written)",
                dest, self.batches_written
            ));
        }
        self.record(
            sink,
            ProgressEvent::new(JobStatus::Failed, message).with_level(EventLevel::Error),
        );
    }

    fn record<S>(&mut self, sink: &mut S, event: ProgressEvent)
    where
        S: ProgressSink + ?Sized,
    {
        sink.emit(&event);
        self.log.push(event);
    }
}
