//! UI sink trait for shell-to-UI event delivery.
//!
//! This module defines the abstraction the shell uses to update whatever UI
//! hosts it. Implementations handle transport details (terminal rendering,
//! desktop window messages, channels in tests).

use crate::events::ShellEvent;

/// Trait for delivering shell events to a UI.
///
/// # Implementations
///
/// - `NoopSink` - For tests and headless contexts
/// - Adapter-specific implementations (terminal, desktop window, etc.)
pub trait UiEventSink: Send + Sync {
    /// Deliver an event.
    ///
    /// Implementations must not block; rendering failures are handled
    /// (logged) internally.
    fn emit(&self, event: ShellEvent);
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    pub const fn new() -> Self {
        Self
    }
}

impl UiEventSink for NoopSink {
    fn emit(&self, _event: ShellEvent) {}
}
