//! Start handshake sent to the worker's stdin.
//!
//! The worker blocks on stdin after its own initialization and begins work
//! when it reads `start`. It must not be told before it is ready, so the
//! supervisor waits according to a [`HandshakePolicy`] first.

use std::time::Duration;

use recshell_core::DEFAULT_HANDSHAKE_DELAY_MS;

/// The token written to the worker's stdin, exactly once.
pub const HANDSHAKE_TOKEN: &str = "start\n";

/// Settle delay used when nothing else is configured.
pub const DEFAULT_HANDSHAKE_DELAY: Duration = Duration::from_millis(DEFAULT_HANDSHAKE_DELAY_MS);

/// When to send [`HANDSHAKE_TOKEN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakePolicy {
    /// Send after a fixed delay from spawn.
    AfterDelay(Duration),

    /// Send as soon as a stdout line starts with `marker`, or after
    /// `timeout`, whichever comes first.
    OnReadyLine { marker: String, timeout: Duration },
}

impl HandshakePolicy {
    pub const fn after_delay(delay: Duration) -> Self {
        Self::AfterDelay(delay)
    }

    pub fn on_ready_line(marker: impl Into<String>, timeout: Duration) -> Self {
        Self::OnReadyLine {
            marker: marker.into(),
            timeout,
        }
    }

    /// Marker the stdout reader should watch for, if any.
    pub fn ready_marker(&self) -> Option<&str> {
        match self {
            Self::AfterDelay(_) => None,
            Self::OnReadyLine { marker, .. } => Some(marker),
        }
    }

    /// Longest the supervisor waits before sending.
    pub const fn max_wait(&self) -> Duration {
        match self {
            Self::AfterDelay(delay) => *delay,
            Self::OnReadyLine { timeout, .. } => *timeout,
        }
    }
}

impl Default for HandshakePolicy {
    fn default() -> Self {
        Self::AfterDelay(DEFAULT_HANDSHAKE_DELAY)
    }
}
