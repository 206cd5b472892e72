//! Classification of worker output lines.
//!
//! The relay is pure and stateless: each line is classified on its own,
//! from its channel and text only.
//!
//! - stdout lines starting with [`PROGRESS_MARKER`] are progress
//! - other stdout lines are plain output
//! - stderr lines are errors, whatever they contain
//!
//! Progress payloads never fail to parse; a payload without a comma yields
//! a progress event with no speed.

use recshell_core::{OutputChannel, OutputEvent, ProgressEvent, ShellEvent};

/// Prefix of a progress line on the worker's stdout.
pub const PROGRESS_MARKER: &str = "electron_progress:";

/// A classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayedLine {
    Progress(ProgressEvent),
    Output(OutputEvent),
    Error(OutputEvent),
}

impl From<RelayedLine> for ShellEvent {
    fn from(line: RelayedLine) -> Self {
        match line {
            RelayedLine::Progress(progress) => Self::Progress(progress),
            RelayedLine::Output(output) => Self::Output(output),
            RelayedLine::Error(output) => Self::Error(output),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressRelay;

impl ProgressRelay {
    pub const fn new() -> Self {
        Self
    }

    pub fn classify(&self, channel: OutputChannel, line: &str) -> RelayedLine {
        match channel {
            OutputChannel::Stderr => RelayedLine::Error(OutputEvent::new(channel, line)),
            OutputChannel::Stdout => match line.strip_prefix(PROGRESS_MARKER) {
                Some(rest) => RelayedLine::Progress(parse_payload(rest.trim())),
                None => RelayedLine::Output(OutputEvent::new(channel, line)),
            },
        }
    }
}

/// Split a `percent,speed` payload on its first comma.
pub fn parse_payload(payload: &str) -> ProgressEvent {
    match payload.split_once(',') {
        Some((percent, speed)) => {
            ProgressEvent::new(payload, percent.trim(), Some(speed.trim().to_string()))
        }
        None => ProgressEvent::new(payload, payload.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(line: &str) -> ProgressEvent {
        match ProgressRelay::new().classify(OutputChannel::Stdout, line) {
            RelayedLine::Progress(p) => p,
            other => panic!("expected progress, got {other:?}"),
        }
    }

    #[test]
    fn test_percent_and_speed_are_split_and_trimmed() {
        let p = parse_payload("42%, 3.1MB/s");
        assert_eq!(p.percent, "42%");
        assert_eq!(p.speed.as_deref(), Some("3.1MB/s"));
    }

    #[test]
    fn test_payload_without_comma_has_no_speed() {
        let p = parse_payload("42%");
        assert_eq!(p.percent, "42%");
        assert_eq!(p.speed, None);
    }

    #[test]
    fn test_only_first_comma_splits() {
        let p = parse_payload("1,5%,2,0KiB/s");
        assert_eq!(p.percent, "1");
        assert_eq!(p.speed.as_deref(), Some("5%,2,0KiB/s"));
    }

    #[test]
    fn test_marker_stripped_and_payload_trimmed() {
        let p = progress("electron_progress:  10%,500KB/s  ");
        assert_eq!(p.payload, "10%,500KB/s");
        assert_eq!(p.percent, "10%");
        assert_eq!(p.speed.as_deref(), Some("500KB/s"));
    }

    #[test]
    fn test_worker_format_is_parsed() {
        let p = progress("electron_progress:37.52%,812.33KiB/s");
        assert_eq!(p.percent_value(), Some(37.52));
        assert_eq!(p.speed.as_deref(), Some("812.33KiB/s"));
    }

    #[test]
    fn test_empty_payload_degrades() {
        let p = progress("electron_progress:");
        assert_eq!(p.payload, "");
        assert_eq!(p.percent, "");
        assert_eq!(p.speed, None);
    }

    #[test]
    fn test_any_line_with_marker_is_progress() {
        let relay = ProgressRelay::new();
        for suffix in ["", "x", " , ", "abc,def,ghi", "\u{1F600}"] {
            let line = format!("{PROGRESS_MARKER}{suffix}");
            match relay.classify(OutputChannel::Stdout, &line) {
                RelayedLine::Progress(p) => assert_eq!(p.payload, suffix.trim()),
                other => panic!("{line:?} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn test_other_stdout_lines_are_output_verbatim() {
        let relay = ProgressRelay::new();
        for line in [
            "Starting download: a.mp4",
            " electron_progress:10%,1KB/s",
            "progress: 10%",
            "ELECTRON_PROGRESS:10%",
            "",
        ] {
            assert_eq!(
                relay.classify(OutputChannel::Stdout, line),
                RelayedLine::Output(OutputEvent::new(OutputChannel::Stdout, line))
            );
        }
    }

    #[test]
    fn test_stderr_is_never_progress() {
        let relay = ProgressRelay::new();
        let line = "electron_progress:10%,500KB/s";
        assert_eq!(
            relay.classify(OutputChannel::Stderr, line),
            RelayedLine::Error(OutputEvent::new(OutputChannel::Stderr, line))
        );
    }

    #[test]
    fn test_relayed_line_maps_to_shell_event() {
        let event: ShellEvent = ProgressRelay::new()
            .classify(OutputChannel::Stderr, "Traceback")
            .into();
        assert_eq!(event.event_name(), "python-error");
    }
}
