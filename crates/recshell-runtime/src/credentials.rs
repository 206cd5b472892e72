//! Credential file lifecycle.
//!
//! The worker reads its OAuth credentials from a JSON file next to it and
//! caches the exchanged token in another. `CredentialStore` writes the first
//! and removes both, so no secret outlives a session.
//!
//! Format (4-space indented):
//! ```text
//! {
//!     "OAuth": {
//!         "account_id": "...",
//!         "client_id": "...",
//!         "client_secret": "..."
//!     }
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use recshell_core::{
    Credentials, CredentialsError, CredentialsFile, PathError, credentials_path, ensure_dir,
    token_path,
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Invalid credentials: {0}")]
    Invalid(#[from] CredentialsError),

    #[error("Credentials directory unavailable: {0}")]
    Directory(#[from] PathError),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode credentials: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CredentialError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Owner of the credentials file and the worker's token cache.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Store files in `dir`, which is also the worker's working directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the credentials file.
    pub fn path(&self) -> PathBuf {
        credentials_path(&self.dir)
    }

    /// Path of the token cache the worker writes.
    pub fn token_path(&self) -> PathBuf {
        token_path(&self.dir)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Write `creds`, replacing any existing file.
    ///
    /// The file is written to a temp name and renamed into place, so the
    /// worker never reads a half-written config.
    pub fn write(&self, creds: &Credentials) -> Result<PathBuf, CredentialError> {
        creds.validate()?;
        ensure_dir(&self.dir)?;

        let final_path = self.path();
        let temp_path = final_path.with_extension("conf.tmp");

        let content = encode(&CredentialsFile::from(creds.clone()))?;
        fs::write(&temp_path, content).map_err(|e| CredentialError::io(&temp_path, e))?;
        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CredentialError::io(&final_path, e)
        })?;

        info!(path = %final_path.display(), "Credentials written");
        Ok(final_path)
    }

    /// Read the current credentials file, if any.
    pub fn read(&self) -> Result<Option<Credentials>, CredentialError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CredentialError::io(&path, e)),
        };
        // Tolerate a UTF-8 BOM; the worker does.
        let file: CredentialsFile = serde_json::from_str(content.trim_start_matches('\u{feff}'))?;
        Ok(Some(file.oauth))
    }

    /// Delete the credentials file and the token cache (idempotent).
    ///
    /// Returns `true` if anything was removed. Both files are attempted even
    /// if the first removal fails; the first error is returned.
    pub fn clear(&self) -> Result<bool, CredentialError> {
        let mut removed = false;
        let mut first_error = None;

        for path in [self.path(), self.token_path()] {
            match remove_if_present(&path) {
                Ok(true) => {
                    info!(path = %path.display(), "Removed");
                    removed = true;
                }
                Ok(false) => debug!(path = %path.display(), "Nothing to remove"),
                Err(e) => {
                    first_error.get_or_insert(CredentialError::io(&path, e));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }
}

fn encode(file: &CredentialsFile) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    file.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

fn remove_if_present(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn creds() -> Credentials {
        Credentials::new("acct", "client", "secret")
    }

    #[test]
    fn test_write_produces_worker_format() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        let path = store.write(&creds()).unwrap();
        assert_eq!(path, dir.path().join("zoom-recording-downloader.conf"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"OAuth\": {\n        \"account_id\": \"acct\""));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["OAuth"]["client_secret"], "secret");
    }

    #[test]
    fn test_write_overwrites_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        store.write(&creds()).unwrap();
        store
            .write(&Credentials::new("acct2", "client2", "secret2"))
            .unwrap();

        assert_eq!(store.read().unwrap().unwrap().account_id, "acct2");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested/app"));
        store.write(&creds()).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_write_rejects_blank_fields() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        let err = store.write(&Credentials::new("", "client", "secret"));
        assert!(matches!(err, Err(CredentialError::Invalid(_))));
        assert!(!store.exists());
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a dir").unwrap();

        let store = CredentialStore::new(&blocker);
        assert!(matches!(
            store.write(&creds()),
            Err(CredentialError::Directory(PathError::NotADirectory(_)))
        ));
    }

    #[test]
    fn test_clear_removes_config_and_token() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.write(&creds()).unwrap();
        fs::write(store.token_path(), br#"{"access_token":"t"}"#).unwrap();

        assert!(store.clear().unwrap());
        assert!(!store.exists());
        assert!(!store.token_path().exists());
    }

    #[test]
    fn test_clear_when_absent_is_ok() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(!store.clear().unwrap());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_read_accepts_bom() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        fs::write(
            store.path(),
            "\u{feff}{\"OAuth\":{\"account_id\":\"a\",\"client_id\":\"b\",\"client_secret\":\"c\"}}",
        )
        .unwrap();

        assert_eq!(
            store.read().unwrap(),
            Some(Credentials::new("a", "b", "c"))
        );
    }

    #[test]
    fn test_read_when_absent() {
        let dir = tempdir().unwrap();
        assert!(CredentialStore::new(dir.path()).read().unwrap().is_none());
    }
}
