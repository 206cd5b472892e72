//! Terminal presentation.

pub mod terminal;

pub use terminal::TerminalSink;
