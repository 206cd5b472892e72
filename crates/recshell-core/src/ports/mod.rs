//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the shell expects from its host. They use only
//! domain types.

pub mod ui_sink;

pub use ui_sink::{NoopSink, UiEventSink};
