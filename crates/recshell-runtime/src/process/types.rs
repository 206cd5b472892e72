//! Shared types for worker process management.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Identifies one spawned worker across its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(pub(crate) u64);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Lifecycle of the single worker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// No worker; `start` is allowed.
    Idle,
    /// Spawned, handshake not yet written.
    Starting,
    /// Handshake written; the worker is doing its job.
    Running,
    /// Termination requested, exit not yet observed.
    Stopping,
}

impl WorkerState {
    /// Whether a worker process currently occupies the slot.
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// What `start` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new worker was spawned.
    Started { pid: u32 },
    /// A worker was already live; nothing happened.
    AlreadyRunning,
}

/// Information about the live worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerInfo {
    pub id: WorkerId,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
}

/// How to launch the worker.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    program: OsString,
    args: Vec<OsString>,
    working_dir: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    script: Option<PathBuf>,
}

impl WorkerCommand {
    /// Run an arbitrary program.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
            script: None,
        }
    }

    /// `<interpreter> <script>`, unbuffered, running in `working_dir`.
    ///
    /// A relative `script` is resolved against the current directory here,
    /// since the worker itself runs in `working_dir`. The script must exist
    /// when the worker is started.
    pub fn python_script(
        interpreter: impl Into<OsString>,
        script: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        let script = script.into();
        let script = std::path::absolute(&script).unwrap_or(script);
        let mut command = Self::new(interpreter)
            .arg(script.as_os_str())
            .current_dir(working_dir)
            .env("PYTHONUNBUFFERED", "1");
        command.script = Some(script);
        command
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn script(&self) -> Option<&Path> {
        self.script.as_deref()
    }

    pub(crate) fn env_vars(&self) -> &[(OsString, OsString)] {
        &self.env
    }
}

/// Failures starting the worker. The slot stays `Idle` on every variant.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Worker script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Worker was spawned without a {0} pipe")]
    MissingPipe(&'static str),
}
