//! # API Module
//!
//! HTTP handlers of the local service. They are the caller-facing side of the
//! shuffle pipeline: each request names a source playlist, obtains a fresh
//! credential from the shared token manager and starts one job.
//!
//! ## Endpoints
//!
//! - [`health`] - `GET /health`, status and version for monitoring
//! - [`shuffle`] - `POST /playlists/{id}/shuffle`, runs the job and returns
//!   its summary once it is finished
//! - [`shuffle_background`] - `POST /playlists/{id}/shuffle/background`,
//!   answers `202 Accepted` with the job id and runs the job in its own task;
//!   progress and failures go to the operational log only
//! - [`shuffle_stream`] - `GET /playlists/{id}/shuffle/stream`, streams
//!   progress events as newline-delimited JSON while the job runs
//!
//! ## Error Responses
//!
//! Errors raised before a job starts are answered with
//! `{"error": <kind>, "message": <text>}`:
//!
//! - `401` when no valid credential can be obtained
//! - `400` for a missing playlist id
//!
//! Once a job has run, the synchronous endpoint answers with the job summary
//! and a status derived from the failure (`404` unknown playlist, `422`
//! empty playlist, `502` remote failure).
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use plshuffle::server::{AppState, build_router};
//!
//! let app = build_router(state);
//! ```

mod health;
mod shuffle;

pub use health::health;
pub use shuffle::shuffle;
pub use shuffle::shuffle_background;
pub use shuffle::shuffle_stream;
