//! Spotify Playlist Shuffler Library
//!
//! This library turns an existing Spotify playlist into a new private playlist
//! holding the same tracks in a uniformly shuffled order. It covers the job
//! pipeline itself, the Spotify Web API client it runs against, token
//! management, progress delivery and the small HTTP surface used to trigger
//! jobs from other tools.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local service
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy for jobs and remote calls
//! - `job` - The shuffle job state machine and its progress sinks
//! - `management` - Token caching and credential hand-out
//! - `server` - Router construction and the listening loop
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use plshuffle::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> plshuffle::Res<()> {
//!     config::load_env().await?;
//!     cli::shuffle("37i9dQZF1DXcBWIGoYBM5M".to_string()).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for glue code that may fail.
///
/// Library operations with a well-defined failure taxonomy return the
/// typed errors from [`error`]; this alias covers the binary and setup
/// paths where any error is simply reported.
///
/// # Example
///
/// ```
/// use plshuffle::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Fetching playlist {}", playlist_id);
/// info!("Fetched {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Token cached");
/// success!("Created playlist {}", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// error!("Failed to shuffle playlist: {}", err);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Cover image could not be copied");
/// warning!("Skipped {} local tracks", skipped);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a failure message with a red cross without exiting.
///
/// For reporting a failed operation while the program keeps running, e.g. a
/// job that ended in `Failed`. Use `error!` when the process has to stop.
///
/// # Example
///
/// ```
/// failure!("Job {} failed: {}", job_id, err);
/// // Output: [✗] Job 3fQ9kLm2xPz8RtYw failed: ...
/// ```
#[macro_export]
macro_rules! failure {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✗".red().bold(), std::format_args!($($arg)*));
  })
}
