//! Worker process management.
//!
//! # Structure
//!
//! - `WorkerProcess` - Owner of the single worker slot (start/stop/state)
//! - `WorkerEvent` - Raw output lines, handshake results and exit
//! - `HandshakePolicy` - When the `start` token is written to stdin
//! - `shutdown` - SIGTERM → SIGKILL termination

mod events;
mod handshake;
pub mod shutdown;
mod stream;
mod supervisor;
mod types;
mod worker;

pub use events::WorkerEvent;
pub use handshake::{DEFAULT_HANDSHAKE_DELAY, HANDSHAKE_TOKEN, HandshakePolicy};
pub use shutdown::shutdown_child;
pub use types::{StartOutcome, WorkerCommand, WorkerError, WorkerId, WorkerInfo, WorkerState};
pub use worker::WorkerProcess;
