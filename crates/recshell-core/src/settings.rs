//! Shell settings and validation.
//!
//! Pure domain types: resolving values from flags or the environment is the
//! adapter's job, which hands the result over as a [`SettingsOverrides`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paths::WORKER_SCRIPT_NAME;

/// Interpreter used to run the worker script.
pub const DEFAULT_INTERPRETER: &str = "python";

/// Settle time between spawning the worker and sending it `start`.
pub const DEFAULT_HANDSHAKE_DELAY_MS: u64 = 1000;

/// How long a terminated worker gets before it is killed outright.
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 5000;

/// Fully resolved shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellSettings {
    /// Program that runs the worker script.
    pub interpreter: String,

    /// Path to the worker script, passed as the interpreter's only argument.
    pub script_path: PathBuf,

    /// Directory holding the credentials file; also the worker's working directory.
    pub data_dir: PathBuf,

    /// Milliseconds to wait after spawn before the handshake.
    pub handshake_delay_ms: u64,

    /// Milliseconds between SIGTERM and a hard kill on stop.
    pub shutdown_grace_ms: u64,
}

impl ShellSettings {
    /// Defaults rooted at `data_dir`.
    pub fn with_defaults(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            script_path: data_dir.join(WORKER_SCRIPT_NAME),
            data_dir,
            handshake_delay_ms: DEFAULT_HANDSHAKE_DELAY_MS,
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE_MS,
        }
    }

    pub const fn handshake_delay(&self) -> Duration {
        Duration::from_millis(self.handshake_delay_ms)
    }

    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Apply every override that is set.
    pub fn merge(&mut self, overrides: &SettingsOverrides) {
        if let Some(ref interpreter) = overrides.interpreter {
            self.interpreter.clone_from(interpreter);
        }
        if let Some(ref script) = overrides.script_path {
            self.script_path.clone_from(script);
        }
        if let Some(delay) = overrides.handshake_delay_ms {
            self.handshake_delay_ms = delay;
        }
        if let Some(grace) = overrides.shutdown_grace_ms {
            self.shutdown_grace_ms = grace;
        }
    }
}

/// Optional values collected from flags and the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsOverrides {
    pub interpreter: Option<String>,
    pub script_path: Option<PathBuf>,
    pub handshake_delay_ms: Option<u64>,
    pub shutdown_grace_ms: Option<u64>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Interpreter cannot be empty")]
    EmptyInterpreter,

    #[error("Worker script path cannot be empty")]
    EmptyScriptPath,

    #[error("Handshake delay must be at most 60000 ms, got {0}")]
    InvalidHandshakeDelay(u64),

    #[error("Shutdown grace must be between 100 and 60000 ms, got {0}")]
    InvalidShutdownGrace(u64),
}

/// Validate settings values.
pub fn validate_settings(settings: &ShellSettings) -> Result<(), SettingsError> {
    if settings.interpreter.trim().is_empty() {
        return Err(SettingsError::EmptyInterpreter);
    }

    if settings.script_path.as_os_str().is_empty() {
        return Err(SettingsError::EmptyScriptPath);
    }

    if settings.handshake_delay_ms > 60_000 {
        return Err(SettingsError::InvalidHandshakeDelay(
            settings.handshake_delay_ms,
        ));
    }

    if !(100..=60_000).contains(&settings.shutdown_grace_ms) {
        return Err(SettingsError::InvalidShutdownGrace(
            settings.shutdown_grace_ms,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ShellSettings::with_defaults("/srv/rec");
        assert_eq!(settings.interpreter, "python");
        assert_eq!(
            settings.script_path,
            PathBuf::from("/srv/rec/zoom-recording-downloader.py")
        );
        assert_eq!(settings.handshake_delay(), Duration::from_secs(1));
        assert_eq!(settings.shutdown_grace(), Duration::from_secs(5));
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_merge_only_touches_set_fields() {
        let mut settings = ShellSettings::with_defaults("/srv/rec");
        settings.merge(&SettingsOverrides {
            interpreter: Some("python3".to_string()),
            handshake_delay_ms: Some(250),
            ..Default::default()
        });

        assert_eq!(settings.interpreter, "python3");
        assert_eq!(settings.handshake_delay_ms, 250);
        assert_eq!(settings.shutdown_grace_ms, DEFAULT_SHUTDOWN_GRACE_MS);
        assert!(settings.script_path.ends_with(WORKER_SCRIPT_NAME));
    }

    #[test]
    fn test_validate_empty_interpreter() {
        let settings = ShellSettings {
            interpreter: "  ".to_string(),
            ..ShellSettings::with_defaults("/srv/rec")
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyInterpreter)
        ));
    }

    #[test]
    fn test_validate_handshake_too_long() {
        let settings = ShellSettings {
            handshake_delay_ms: 120_000,
            ..ShellSettings::with_defaults("/srv/rec")
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidHandshakeDelay(120_000))
        ));
    }

    #[test]
    fn test_validate_zero_handshake_allowed() {
        let settings = ShellSettings {
            handshake_delay_ms: 0,
            ..ShellSettings::with_defaults("/srv/rec")
        };
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_shutdown_grace_bounds() {
        let settings = ShellSettings {
            shutdown_grace_ms: 10,
            ..ShellSettings::with_defaults("/srv/rec")
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidShutdownGrace(10))
        ));
    }
}
