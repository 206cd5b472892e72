//! CLI bootstrap - the composition root.
//!
//! Resolves settings from flags, the environment and defaults, then wires
//! the credential store, worker and terminal sink into a `ShellController`.

use std::path::PathBuf;
use std::sync::Arc;

use recshell_core::{
    ShellSettings, UiEventSink, data_root, normalize_user_path, validate_settings,
};
use recshell_runtime::ShellController;
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub settings: ShellSettings,
}

impl ShellConfig {
    /// Resolve the configuration for a parsed command line.
    ///
    /// Precedence: flag > environment > default. The script defaults to the
    /// worker's file name inside the resolved data directory.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let data_dir = match cli.data_dir.as_deref() {
            Some(raw) => normalize_user_path(raw)?,
            None => data_root()?,
        };
        Self::resolve(data_dir, cli)
    }

    fn resolve(data_dir: PathBuf, cli: &Cli) -> Result<Self, CliError> {
        let mut settings = ShellSettings::with_defaults(data_dir);
        settings.merge(&cli.overrides());
        // Relative to the invocation directory, not the data dir.
        if let Some(script) = cli.script.as_deref() {
            settings.script_path = normalize_user_path(&script.to_string_lossy())?;
        }
        validate_settings(&settings)?;

        debug!(
            data_dir = %settings.data_dir.display(),
            script = %settings.script_path.display(),
            interpreter = %settings.interpreter,
            "Resolved shell settings"
        );
        Ok(Self { settings })
    }
}

/// Compose the controller for `config`, reporting to `sink`.
pub fn bootstrap(config: &ShellConfig, sink: Arc<dyn UiEventSink>) -> ShellController {
    ShellController::from_settings(&config.settings, sink)
}
