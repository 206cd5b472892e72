//! Terminal rendering of shell events.
//!
//! Progress drives a single `indicatif` bar; every other line is printed
//! above it. Lines hidden by the output display filter are not printed.

use std::sync::{Mutex, MutexGuard, PoisonError};

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use recshell_core::{ProgressEvent, ShellEvent, UiEventSink};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}";

/// `UiEventSink` that renders to the terminal.
pub struct TerminalSink {
    bar: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            hidden: false,
        }
    }

    /// A sink that keeps its state but draws nothing.
    pub fn hidden() -> Self {
        Self {
            bar: Mutex::new(None),
            hidden: true,
        }
    }

    /// Current bar position in percent, if a bar is showing.
    pub fn position(&self) -> Option<u64> {
        self.lock().as_ref().map(ProgressBar::position)
    }

    /// Remove the bar, leaving the last state on screen.
    pub fn finish(&self) {
        if let Some(pb) = self.lock().take() {
            pb.abandon();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create_bar(&self) -> ProgressBar {
        let target = if self.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let pb = ProgressBar::with_draw_target(Some(100), target);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    fn progress(&self, event: &ProgressEvent) {
        let mut guard = self.lock();
        let pb = guard.get_or_insert_with(|| self.create_bar());

        match event.percent_value() {
            Some(percent) => {
                // Clamped to 0..=100 already.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                pb.set_position(percent.round() as u64);
                pb.set_message(event.speed.clone().unwrap_or_default());
            }
            None => pb.set_message(event.payload.clone()),
        }
    }

    fn line(&self, text: impl std::fmt::Display) {
        if self.hidden {
            return;
        }
        let guard = self.lock();
        match guard.as_ref() {
            Some(pb) => pb.println(text.to_string()),
            None => eprintln!("{text}"),
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl UiEventSink for TerminalSink {
    fn emit(&self, event: ShellEvent) {
        match event {
            ShellEvent::Progress(progress) => self.progress(&progress),
            ShellEvent::Output(output) => {
                if output.is_displayable() {
                    self.line(output.text);
                }
            }
            ShellEvent::Error(output) => self.line(style(output.text).red()),
            ShellEvent::WorkerStarted { pid, .. } => {
                self.line(style(format!("Worker started (pid {pid})")).green());
            }
            ShellEvent::WorkerAlreadyRunning => {
                self.line(style("Worker is already running").yellow());
            }
            ShellEvent::WorkerExited { code } => {
                let message = match code {
                    Some(0) => style("Worker finished".to_string()).green(),
                    Some(code) => style(format!("Worker exited with code {code}")).red(),
                    None => style("Worker terminated".to_string()).yellow(),
                };
                self.line(message);
                self.finish();
            }
            ShellEvent::WorkerFailed { message } => {
                self.line(style(format!("✗ {message}")).red().bold());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recshell_core::{OutputChannel, OutputEvent};

    fn progress(payload: &str, percent: &str, speed: Option<&str>) -> ShellEvent {
        ShellEvent::Progress(ProgressEvent::new(
            payload,
            percent,
            speed.map(str::to_string),
        ))
    }

    #[test]
    fn test_progress_moves_bar() {
        let sink = TerminalSink::hidden();
        assert_eq!(sink.position(), None);

        sink.emit(progress("10.00%,500.00KiB/s", "10.00%", Some("500.00KiB/s")));
        assert_eq!(sink.position(), Some(10));

        sink.emit(progress("42.6%,1MiB/s", "42.6%", Some("1MiB/s")));
        assert_eq!(sink.position(), Some(43));
    }

    #[test]
    fn test_unparseable_percent_keeps_position() {
        let sink = TerminalSink::hidden();
        sink.emit(progress("30%", "30%", None));
        sink.emit(progress("soon", "soon", None));
        assert_eq!(sink.position(), Some(30));
    }

    #[test]
    fn test_exit_removes_bar() {
        let sink = TerminalSink::hidden();
        sink.emit(progress("5%", "5%", None));
        sink.emit(ShellEvent::Output(OutputEvent::new(
            OutputChannel::Stdout,
            "progress:hidden",
        )));
        sink.emit(ShellEvent::WorkerExited { code: Some(0) });
        assert_eq!(sink.position(), None);
    }
}
