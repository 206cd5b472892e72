//! Core domain types and ports for `recshell`.
//!
//! This crate has no process or terminal code. It defines what the shell
//! talks about (credentials, worker output, UI events), where its files live,
//! and the [`UiEventSink`] port every UI adapter implements.
#![deny(unsafe_code)]

pub mod domain;
pub mod events;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{Credentials, CredentialsError, CredentialsFile};
pub use events::{
    LEGACY_PROGRESS_PREFIX, OutputChannel, OutputEvent, ProgressEvent, ShellEvent, names,
};
pub use paths::{
    CREDENTIALS_FILE_NAME, DATA_DIR_ENV, PathError, TOKEN_FILE_NAME, WORKER_SCRIPT_NAME,
    credentials_path, data_root, ensure_dir, normalize_user_path, token_path,
};
pub use ports::{NoopSink, UiEventSink};
pub use settings::{
    DEFAULT_HANDSHAKE_DELAY_MS, DEFAULT_INTERPRETER, DEFAULT_SHUTDOWN_GRACE_MS, SettingsError,
    SettingsOverrides, ShellSettings, validate_settings,
};
