//! Command-line arguments.
//!
//! Every option can also come from the environment (or a `.env` file loaded
//! before parsing). Flags win over the environment.

use std::path::PathBuf;

use clap::Parser;
use recshell_core::SettingsOverrides;

/// Download cloud recordings through the recording-downloader worker.
///
/// Missing credential fields are prompted for interactively. The credentials
/// file is removed again when the worker finishes or on Ctrl-C.
#[derive(Parser, Debug)]
#[command(name = "recshell")]
#[command(about = "Run the recording-downloader worker with OAuth credentials")]
#[command(version)]
pub struct Cli {
    /// OAuth account ID
    #[arg(long = "account-id", env = "ZOOM_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// OAuth client ID
    #[arg(long = "client-id", env = "ZOOM_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long = "client-secret", env = "ZOOM_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Worker script to run [default: <data dir>/zoom-recording-downloader.py]
    #[arg(long, env = "RECSHELL_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Interpreter that runs the worker script [default: python]
    #[arg(long, env = "RECSHELL_PYTHON")]
    pub interpreter: Option<String>,

    /// Directory for the credentials file; also the worker's working directory
    #[arg(long = "data-dir", env = "RECSHELL_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Milliseconds to wait after spawning before sending `start`
    #[arg(long = "handshake-ms", env = "RECSHELL_HANDSHAKE_MS")]
    pub handshake_ms: Option<u64>,

    /// Milliseconds a terminated worker gets before it is killed
    #[arg(long = "shutdown-grace-ms", env = "RECSHELL_SHUTDOWN_GRACE_MS")]
    pub shutdown_grace_ms: Option<u64>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Settings values given on the command line or in the environment.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            interpreter: self.interpreter.clone(),
            script_path: self.script.clone(),
            handshake_delay_ms: self.handshake_ms,
            shutdown_grace_ms: self.shutdown_grace_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_data_dir_env_matches_core() {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "data_dir")
            .unwrap();
        assert_eq!(
            arg.get_env().and_then(|v| v.to_str()),
            Some(recshell_core::DATA_DIR_ENV)
        );
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::parse_from([
            "recshell",
            "--account-id",
            "acct",
            "--script",
            "/opt/worker.py",
            "--interpreter",
            "python3",
            "--handshake-ms",
            "250",
            "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.account_id.as_deref(), Some("acct"));

        let overrides = cli.overrides();
        assert_eq!(overrides.interpreter.as_deref(), Some("python3"));
        assert_eq!(overrides.script_path, Some(PathBuf::from("/opt/worker.py")));
        assert_eq!(overrides.handshake_delay_ms, Some(250));
        assert_eq!(overrides.shutdown_grace_ms, None);
    }

    #[test]
    fn test_rejects_non_numeric_delay() {
        let result = Cli::try_parse_from(["recshell", "--handshake-ms", "soon"]);
        assert!(result.is_err());
    }
}
