//! Terminal host for `recshell`.
//!
//! Parses arguments, collects credentials, and renders worker progress while
//! the runtime supervises the worker.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod parser;
pub mod presentation;
pub mod utils;

// Re-export primary types for convenient access
pub use bootstrap::{ShellConfig, bootstrap};
pub use error::CliError;
pub use parser::Cli;
pub use presentation::TerminalSink;
