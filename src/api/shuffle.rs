use std::convert::Infallible;

use async_stream::stream;
use axum::{
    Extension, Json,
    body::Body,
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc;

use crate::{
    error::ShuffleError,
    job::{ChannelSink, LogSink, ShuffleJob},
    management::TokenProvider,
    server::AppState,
    spotify::SpotifyClient,
    types::{JobSummary, ProgressEvent},
};

/// One line of a progress stream.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamLine {
    Progress(ProgressEvent),
    Summary(JobSummary),
    Error { kind: &'static str, message: String },
}

impl StreamLine {
    fn to_ndjson(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_else(|e| {
            json!({ "type": "error", "kind": "encoding", "message": e.to_string() }).to_string()
        });
        line.push('\n');
        line
    }
}

/// Validates the id and hands out an owned client for a new job.
///
/// The token manager is locked only while a credential is obtained.
async fn prepare(
    state: &AppState,
    playlist_id: String,
) -> Result<(ShuffleJob, SpotifyClient), ShuffleError> {
    let job = ShuffleJob::new(playlist_id)?;
    let credential = {
        let mut tokens = state.tokens.lock().await;
        tokens.get_valid_credential().await?
    };
    let client = SpotifyClient::with_http(state.http.clone(), state.api_url.clone(), credential);
    Ok((job, client))
}

pub(crate) fn status_for(err: &ShuffleError) -> StatusCode {
    match err {
        ShuffleError::Auth(_) => StatusCode::UNAUTHORIZED,
        ShuffleError::MissingPlaylistId => StatusCode::BAD_REQUEST,
        ShuffleError::EmptySource(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ShuffleError::AlreadyStarted(_) => StatusCode::CONFLICT,
        ShuffleError::Fetch(e) if e.status() == Some(404) => StatusCode::NOT_FOUND,
        ShuffleError::Fetch(_) | ShuffleError::Create(_) | ShuffleError::Write { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn error_response(err: &ShuffleError) -> Response {
    let body = Json(json!({
        "error": err.kind(),
        "message": err.to_string(),
    }));
    (status_for(err), body).into_response()
}

/// `POST /playlists/{id}/shuffle`: runs the job and answers once it is over.
pub async fn shuffle(
    Path(playlist_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Response {
    let (mut job, client) = match prepare(&state, playlist_id).await {
        Ok(prepared) => prepared,
        Err(e) => return error_response(&e),
    };

    let mut sink = LogSink::new(job.id());
    match job.run(&client, &mut sink).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => (status_for(&e), Json(job.summary())).into_response(),
    }
}

/// `POST /playlists/{id}/shuffle/background`: acknowledges immediately and
/// runs the job in its own task. Progress only reaches the log.
pub async fn shuffle_background(
    Path(playlist_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Response {
    let (mut job, client) = match prepare(&state, playlist_id).await {
        Ok(prepared) => prepared,
        Err(e) => return error_response(&e),
    };

    let job_id = job.id().to_string();
    let source_playlist_id = job.source_playlist_id().to_string();

    // job and client are owned by the task; nothing borrowed from the request
    tokio::spawn(async move {
        let mut sink = LogSink::new(job.id());
        if let Err(e) = job.run(&client, &mut sink).await {
            tracing::error!(
                job_id = %job.id(),
                source = %job.source_playlist_id(),
                destination = ?job.destination_playlist_id(),
                kind = e.kind(),
                "Background shuffle failed: {}",
                e
            );
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "job_id": job_id,
            "source_playlist_id": source_playlist_id,
            "status": "processing",
        })),
    )
        .into_response()
}

/// `GET /playlists/{id}/shuffle/stream`: streams the job's progress, one JSON
/// object per line. The last line is the job summary.
///
/// The job runs in its own task. A client that disconnects stops receiving
/// lines but does not stop the job.
pub async fn shuffle_stream(
    Path(playlist_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Response {
    let (mut job, client) = match prepare(&state, playlist_id).await {
        Ok(prepared) => prepared,
        Err(e) => return error_response(&e),
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let job_id = job.id().to_string();

    // the sink, and with it the sender, is dropped when the task ends
    let task = tokio::spawn(async move {
        let mut sink = ChannelSink::new(tx);
        let outcome = job.run(&client, &mut sink).await;
        if let Err(e) = &outcome {
            tracing::error!(
                job_id = %job.id(),
                source = %job.source_playlist_id(),
                destination = ?job.destination_playlist_id(),
                kind = e.kind(),
                "Streamed shuffle failed: {}",
                e
            );
        }
        (job.summary(), outcome.err())
    });

    let body = stream! {
        while let Some(event) = rx.recv().await {
            yield Ok::<_, Infallible>(StreamLine::Progress(event).to_ndjson());
        }

        match task.await {
            Ok((summary, error)) => {
                if let Some(e) = error {
                    yield Ok(StreamLine::Error { kind: e.kind(), message: e.to_string() }.to_ndjson());
                }
                yield Ok(StreamLine::Summary(summary).to_ndjson());
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, "Shuffle task did not finish: {}", e);
                yield Ok(StreamLine::Error { kind: "internal", message: e.to_string() }.to_ndjson());
            }
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
