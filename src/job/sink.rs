//! Progress delivery strategies.
//!
//! A job reports every state change and batch through one [`ProgressSink`].
//! The pipeline does not know where events end up:
//!
//! - [`LogSink`] writes to the operational log. Used for background jobs,
//!   whose caller has already received its acknowledgment.
//! - [`ChannelSink`] forwards events over a channel that backs a streamed
//!   HTTP response, so the caller sees progress while the job runs.
//! - [`ConsoleSink`] prints to the terminal for the command-line interface.
//! - `Vec<ProgressEvent>` collects events in memory.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    failure, info, success,
    types::{EventLevel, JobStatus, ProgressEvent},
    warning,
};

/// Ordered receiver of a job's progress events.
pub trait ProgressSink: Send {
    fn emit(&mut self, event: &ProgressEvent);
}

impl ProgressSink for Vec<ProgressEvent> {
    fn emit(&mut self, event: &ProgressEvent) {
        self.push(event.clone());
    }
}

/// Background strategy: events go to `tracing`, tagged with the job id.
pub struct LogSink {
    job_id: String,
}

impl LogSink {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}

impl ProgressSink for LogSink {
    fn emit(&mut self, event: &ProgressEvent) {
        let (count, total) = match event.progress {
            Some(p) => (Some(p.count), p.total),
            None => (None, None),
        };

        match event.level {
            EventLevel::Info => tracing::info!(
                job_id = %self.job_id,
                stage = %event.stage,
                count,
                total,
                "{}",
                event.message
            ),
            EventLevel::Warning => tracing::warn!(
                job_id = %self.job_id,
                stage = %event.stage,
                "{}",
                event.message
            ),
            EventLevel::Error => tracing::error!(
                job_id = %self.job_id,
                stage = %event.stage,
                "{}",
                event.message
            ),
        }
    }
}

/// Inline-streaming strategy.
///
/// A closed receiver means the client went away; the job still runs to
/// completion and further events are dropped.
pub struct ChannelSink {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&mut self, event: &ProgressEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Terminal output for the CLI, with a progress bar while tracks are written.
pub struct ConsoleSink {
    bar: Option<ProgressBar>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn update_bar(&mut self, count: usize, total: usize) {
        let bar = self.bar.get_or_insert_with(|| {
            let pb = ProgressBar::new(total as u64);
            let style = ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            pb
        });
        bar.set_position(count as u64);
    }

    fn finish_bar(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleSink {
    fn emit(&mut self, event: &ProgressEvent) {
        if event.stage == JobStatus::WritingTracks {
            if let Some(progress) = event.progress {
                if let Some(total) = progress.total {
                    self.update_bar(progress.count, total);
                    if let Some(bar) = &self.bar {
                        bar.set_message(event.message.clone());
                    }
                    return;
                }
            }
        }

        self.finish_bar();
        match ConsoleLine::for_event(event) {
            ConsoleLine::Failure => failure!("{}", event.message),
            ConsoleLine::Warning => warning!("{}", event.message),
            ConsoleLine::Success => success!("{}", event.message),
            ConsoleLine::Info => info!("{}", event.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleLine {
    Info,
    Success,
    Warning,
    Failure,
}

impl ConsoleLine {
    fn for_event(event: &ProgressEvent) -> Self {
        match (event.stage, event.level) {
            (JobStatus::Failed, _) | (_, EventLevel::Error) => ConsoleLine::Failure,
            (_, EventLevel::Warning) => ConsoleLine::Warning,
            (JobStatus::Done, _) => ConsoleLine::Success,
            _ => ConsoleLine::Info,
        }
    }
}
