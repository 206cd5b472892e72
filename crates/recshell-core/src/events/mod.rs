//! Canonical event union sent from the shell to the UI layer.
//!
//! Every adapter (terminal, desktop window, test recorder) receives the same
//! [`ShellEvent`] values through the [`UiEventSink`](crate::ports::UiEventSink)
//! port and uses [`ShellEvent::event_name`] for its channel naming.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "progress", "payload": "10%,500KB/s", "percent": "10%", "speed": "500KB/s" }
//! ```

mod output;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use output::{LEGACY_PROGRESS_PREFIX, OutputChannel, OutputEvent, ProgressEvent};

/// Channel name constants.
///
/// The `python-*` names are the ones the desktop renderer listens
/// on. Keep strings stable.
pub mod names {
    pub const PYTHON_PROGRESS: &str = "python-progress";
    pub const PYTHON_OUTPUT: &str = "python-output";
    pub const PYTHON_ERROR: &str = "python-error";

    pub const WORKER_STARTED: &str = "worker:started";
    pub const WORKER_ALREADY_RUNNING: &str = "worker:already-running";
    pub const WORKER_EXITED: &str = "worker:exited";
    pub const WORKER_FAILED: &str = "worker:failed";
}

/// Everything the shell tells the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEvent {
    /// A progress line was parsed.
    Progress(ProgressEvent),

    /// An informational stdout line.
    Output(OutputEvent),

    /// A stderr line; always rendered with error styling.
    Error(OutputEvent),

    /// The worker process was spawned.
    WorkerStarted {
        pid: u32,
        #[serde(rename = "startedAt")]
        started_at: DateTime<Utc>,
    },

    /// A start request arrived while a worker was live; nothing was done.
    WorkerAlreadyRunning,

    /// The worker terminated. `code` is `None` when it was killed by a signal.
    WorkerExited { code: Option<i32> },

    /// The shell could not get the worker going (credential write or spawn).
    WorkerFailed { message: String },
}

impl ShellEvent {
    /// Channel this event is published on.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Progress(_) => names::PYTHON_PROGRESS,
            Self::Output(_) => names::PYTHON_OUTPUT,
            Self::Error(_) => names::PYTHON_ERROR,
            Self::WorkerStarted { .. } => names::WORKER_STARTED,
            Self::WorkerAlreadyRunning => names::WORKER_ALREADY_RUNNING,
            Self::WorkerExited { .. } => names::WORKER_EXITED,
            Self::WorkerFailed { .. } => names::WORKER_FAILED,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::WorkerFailed {
            message: message.into(),
        }
    }
}
