//! Well-known file names shared with the worker script.
//!
//! The worker opens its config and token cache by relative path, so all of
//! these live in one directory which is also the worker's working directory.

use std::path::{Path, PathBuf};

/// Config file the worker reads its OAuth credentials from.
pub const CREDENTIALS_FILE_NAME: &str = "zoom-recording-downloader.conf";

/// Token cache the worker writes after its OAuth exchange.
pub const TOKEN_FILE_NAME: &str = "access_token.json";

/// Default worker script name.
pub const WORKER_SCRIPT_NAME: &str = "zoom-recording-downloader.py";

pub fn credentials_path(dir: &Path) -> PathBuf {
    dir.join(CREDENTIALS_FILE_NAME)
}

pub fn token_path(dir: &Path) -> PathBuf {
    dir.join(TOKEN_FILE_NAME)
}
