//! # CLI Module
//!
//! This module provides the command-line interface layer of the playlist
//! shuffler. Each command wires the library pieces together and reports to
//! the terminal with the crate's status macros.
//!
//! ## Commands
//!
//! - [`auth`] - seeds the token cache from a refresh token
//! - [`shuffle`] - shuffles one playlist inline, with live progress
//! - [`serve`] - runs the local HTTP service
//!
//! ## Error Handling
//!
//! Commands end the process through [`error!`](crate::error!) on any
//! unrecoverable failure. Non-fatal problems, such as a cover image that
//! could not be copied, are printed as warnings while the job continues.
//!
//! ## Usage Patterns
//!
//! ```bash
//! plshuffle auth --refresh-token AQD...        # cache a token once
//! plshuffle shuffle spotify:playlist:37i9dQZF1DXcBWIGoYBM5M
//! plshuffle shuffle https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M
//! plshuffle serve --address 0.0.0.0:8888
//! ```

mod auth;
mod serve;
mod shuffle;

pub use auth::auth;
pub use serve::serve;
pub use shuffle::shuffle;
