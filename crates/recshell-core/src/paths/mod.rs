//! Path utilities for the shell's data directory and the files it shares
//! with the worker.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately

mod error;
mod files;
mod platform;

#[cfg(test)]
mod test_utils;

pub use error::PathError;
pub use files::{
    CREDENTIALS_FILE_NAME, TOKEN_FILE_NAME, WORKER_SCRIPT_NAME, credentials_path,
    token_path,
};
pub use platform::{DATA_DIR_ENV, data_root, ensure_dir, normalize_user_path};
