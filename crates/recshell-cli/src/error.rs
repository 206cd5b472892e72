//! CLI-specific error types and mappings.
//!
//! Maps runtime and settings errors to exit codes. The worker's own exit
//! code is never propagated; these cover failures of the host itself.

use recshell_core::{PathError, SettingsError};
use recshell_runtime::{CredentialError, ShellError, WorkerError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or input error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not writable, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker could not be launched.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Process(_) => 71,  // EX_OSERR
        }
    }
}

impl From<ShellError> for CliError {
    fn from(err: ShellError) -> Self {
        match err {
            ShellError::Credentials(CredentialError::Invalid(e)) => Self::Arguments(e.to_string()),
            ShellError::Credentials(CredentialError::Directory(e)) => Self::from(e),
            ShellError::Credentials(e) => Self::Io(e.to_string()),
            ShellError::Worker(e @ WorkerError::ScriptNotFound(_)) => Self::Config(e.to_string()),
            ShellError::Worker(e) => Self::Process(e.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
