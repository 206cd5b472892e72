//! Raw events produced by a supervised worker.
//!
//! These are transport-level: output lines are not yet classified. The
//! controller relays them into UI-facing `ShellEvent`s.

use recshell_core::OutputChannel;

use super::types::WorkerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// One line from stdout or stderr, without its line terminator.
    Output {
        worker: WorkerId,
        channel: OutputChannel,
        text: String,
    },

    /// The handshake token was written to stdin.
    HandshakeSent { worker: WorkerId },

    /// Writing the handshake token failed.
    HandshakeFailed { worker: WorkerId, error: String },

    /// The process terminated and both output streams were drained.
    ///
    /// `code` is `None` when the process was killed by a signal.
    Exited { worker: WorkerId, code: Option<i32> },
}

impl WorkerEvent {
    pub const fn worker(&self) -> WorkerId {
        match self {
            Self::Output { worker, .. }
            | Self::HandshakeSent { worker }
            | Self::HandshakeFailed { worker, .. }
            | Self::Exited { worker, .. } => *worker,
        }
    }
}
