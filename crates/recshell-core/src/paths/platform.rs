//! Platform-specific path detection and resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::PathError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "RECSHELL_DATA_DIR";

/// Get the directory the shell keeps its files in.
///
/// Resolution order:
/// 1. `RECSHELL_DATA_DIR` environment variable (highest priority)
/// 2. The directory containing the running executable
/// 3. System data directory (e.g., `~/.local/share/recshell`)
pub fn data_root() -> Result<PathBuf, PathError> {
    // 1. Runtime override (highest priority)
    if let Ok(path) = env::var(DATA_DIR_ENV) {
        return normalize_user_path(&path);
    }

    // 2. Alongside the application
    if let Some(dir) = executable_dir() {
        return Ok(dir);
    }

    // 3. Default to system data directory
    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    let root = data_dir.join("recshell");
    debug!(path = %root.display(), "Falling back to system data directory");
    ensure_dir(&root)?;
    Ok(root)
}

fn executable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Create `dir` (and parents) if missing; fail if it exists as a file.
pub fn ensure_dir(dir: &Path) -> Result<(), PathError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(PathError::NotADirectory(dir.to_path_buf()));
        }
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| PathError::CreateFailed {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};
    use tempfile::tempdir;

    #[test]
    fn test_env_override_wins() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let _env = EnvVarGuard::set(DATA_DIR_ENV, temp.path().to_string_lossy().as_ref());

        assert_eq!(data_root().unwrap(), temp.path());
    }

    #[test]
    fn test_without_override_uses_executable_dir() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::unset(DATA_DIR_ENV);

        let exe_dir = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(data_root().unwrap(), exe_dir);
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_user_path("   "), Err(PathError::EmptyPath)));
    }

    #[test]
    fn test_normalize_makes_relative_absolute() {
        let path = normalize_user_path("some/dir").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("some/dir"));
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("plain");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(ensure_dir(&file), Err(PathError::NotADirectory(_))));
        assert!(ensure_dir(&temp.path().join("a/b")).is_ok());
        assert!(temp.path().join("a/b").is_dir());
    }
}
