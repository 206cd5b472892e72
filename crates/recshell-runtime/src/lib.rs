//! Runtime for `recshell`: worker supervision, output relay and the
//! credential file lifecycle.
#![deny(unsafe_code)]

pub mod controller;
pub mod credentials;
pub mod process;
pub mod relay;

pub use controller::{ShellController, ShellError};
pub use credentials::{CredentialError, CredentialStore};
pub use process::{
    HANDSHAKE_TOKEN, HandshakePolicy, StartOutcome, WorkerCommand, WorkerError, WorkerEvent,
    WorkerId, WorkerInfo, WorkerProcess, WorkerState,
};
pub use relay::{PROGRESS_MARKER, ProgressRelay, RelayedLine, parse_payload};
