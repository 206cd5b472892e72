//! Per-line payloads relayed from the worker.

use serde::{Deserialize, Serialize};

/// Lines starting with this prefix are hidden from the output pane.
///
/// This is a display convention only; such lines still travel as
/// [`OutputEvent`]s.
pub const LEGACY_PROGRESS_PREFIX: &str = "progress:";

/// Which pipe a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    Stdout,
    Stderr,
}

impl OutputChannel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl std::fmt::Display for OutputChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plain line of worker output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEvent {
    pub channel: OutputChannel,
    pub text: String,
}

impl OutputEvent {
    pub fn new(channel: OutputChannel, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: text.into(),
        }
    }

    /// Whether an output pane should show this line.
    ///
    /// Error lines are always shown.
    pub fn is_displayable(&self) -> bool {
        self.channel == OutputChannel::Stderr || !self.text.starts_with(LEGACY_PROGRESS_PREFIX)
    }
}

/// Download progress reported by the worker.
///
/// `percent` and `speed` are kept as the worker formatted them
/// (`"42.50%"`, `"512.00KiB/s"`); `payload` is the untouched
/// `percent,speed` text for adapters that forward it raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub payload: String,
    pub percent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
}

impl ProgressEvent {
    pub fn new(payload: impl Into<String>, percent: impl Into<String>, speed: Option<String>) -> Self {
        Self {
            payload: payload.into(),
            percent: percent.into(),
            speed,
        }
    }

    /// Numeric view of `percent`, clamped to `0.0..=100.0`.
    ///
    /// Returns `None` when the text is not a number (with or without a
    /// trailing `%`).
    pub fn percent_value(&self) -> Option<f64> {
        let number = self.percent.trim().trim_end_matches('%').trim();
        let value: f64 = number.parse().ok()?;
        if value.is_nan() {
            return None;
        }
        Some(value.clamp(0.0, 100.0))
    }
}
