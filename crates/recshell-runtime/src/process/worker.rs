//! Single-slot worker process lifecycle.
//!
//! `WorkerProcess` owns at most one external worker. It spawns it, hands the
//! child to a supervisor task, and exposes the worker's output and exit as
//! [`WorkerEvent`]s pulled through [`WorkerProcess::next_event`]. All state
//! changes happen on the owner's side while it pulls events, so no locking is
//! involved.

use std::process::Stdio;
use std::time::Duration;

use chrono::Utc;
use recshell_core::{DEFAULT_SHUTDOWN_GRACE_MS, OutputChannel};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::events::WorkerEvent;
use super::handshake::HandshakePolicy;
use super::stream::{ReadyProbe, spawn_stream_reader};
use super::supervisor::{Control, Supervisor, ready_future};
use super::types::{StartOutcome, WorkerCommand, WorkerError, WorkerId, WorkerInfo, WorkerState};

/// The live worker's bookkeeping.
struct WorkerHandle {
    info: WorkerInfo,
    control: mpsc::UnboundedSender<Control>,
}

/// Owner of the single worker slot.
pub struct WorkerProcess {
    command: WorkerCommand,
    handshake: HandshakePolicy,
    shutdown_grace: Duration,
    state: WorkerState,
    handle: Option<WorkerHandle>,
    next_id: u64,
    events_tx: mpsc::UnboundedSender<WorkerEvent>,
    events_rx: mpsc::UnboundedReceiver<WorkerEvent>,
}

impl WorkerProcess {
    /// Create an idle slot for `command` with the default handshake and grace period.
    pub fn new(command: WorkerCommand) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            command,
            handshake: HandshakePolicy::default(),
            shutdown_grace: Duration::from_millis(DEFAULT_SHUTDOWN_GRACE_MS),
            state: WorkerState::Idle,
            handle: None,
            next_id: 1,
            events_tx,
            events_rx,
        }
    }

    #[must_use]
    pub fn with_handshake(mut self, policy: HandshakePolicy) -> Self {
        self.handshake = policy;
        self
    }

    #[must_use]
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub const fn state(&self) -> WorkerState {
        self.state
    }

    /// Whether the slot is occupied (starting, running, or stopping).
    pub const fn is_running(&self) -> bool {
        self.state.is_live()
    }

    pub fn info(&self) -> Option<&WorkerInfo> {
        self.handle.as_ref().map(|h| &h.info)
    }

    pub const fn command(&self) -> &WorkerCommand {
        &self.command
    }

    /// Spawn the worker unless one is already live.
    ///
    /// Must be called from within a tokio runtime. On error the slot stays
    /// `Idle` and nothing is left running.
    pub fn start(&mut self) -> Result<StartOutcome, WorkerError> {
        if self.state.is_live() {
            info!(state = ?self.state, "Worker is already running; ignoring start request");
            return Ok(StartOutcome::AlreadyRunning);
        }

        if let Some(script) = self.command.script() {
            if !script.exists() {
                return Err(WorkerError::ScriptNotFound(script.to_path_buf()));
            }
        }

        let mut child = self.build_command().spawn().map_err(|source| WorkerError::Spawn {
            program: self.command.program().to_string_lossy().into_owned(),
            source,
        })?;

        // Dropping `child` on these error paths kills it (kill_on_drop).
        let stdin = child.stdin.take().ok_or(WorkerError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(WorkerError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(WorkerError::MissingPipe("stderr"))?;
        let pid = child.id().unwrap_or_default();

        let id = WorkerId(self.next_id);
        self.next_id += 1;

        let (probe, ready_signal) = match self.handshake.ready_marker() {
            Some(marker) => {
                let (notify, signal) = oneshot::channel();
                let probe = ReadyProbe {
                    marker: marker.to_string(),
                    notify,
                };
                (Some(probe), Some(signal))
            }
            None => (None, None),
        };

        let readers = vec![
            spawn_stream_reader(
                stdout,
                id,
                OutputChannel::Stdout,
                self.events_tx.clone(),
                probe,
            ),
            spawn_stream_reader(
                stderr,
                id,
                OutputChannel::Stderr,
                self.events_tx.clone(),
                None,
            ),
        ];

        let (control_tx, control_rx) = mpsc::unbounded_channel();
        Supervisor {
            id,
            child,
            stdin,
            ready: ready_future(&self.handshake, ready_signal),
            shutdown_grace: self.shutdown_grace,
            readers,
            events: self.events_tx.clone(),
            control: control_rx,
        }
        .spawn();

        let info = WorkerInfo {
            id,
            pid,
            started_at: Utc::now(),
        };
        info!(worker = %id, pid = %pid, program = ?self.command.program(), "Worker started");

        self.handle = Some(WorkerHandle {
            info,
            control: control_tx,
        });
        self.state = WorkerState::Starting;

        Ok(StartOutcome::Started { pid })
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(self.command.program());
        cmd.args(self.command.args());

        if let Some(dir) = self.command.working_dir() {
            cmd.current_dir(dir);
        }
        for (key, value) in self.command.env_vars() {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Ask the worker to terminate without waiting for it.
    ///
    /// Returns `true` if a termination request was sent. The slot stays
    /// occupied (`Stopping`) until the exit event is pulled, so a `start`
    /// in between is refused.
    pub fn stop(&mut self) -> bool {
        match self.state {
            WorkerState::Idle | WorkerState::Stopping => {
                debug!(state = ?self.state, "stop requested with no worker to terminate");
                false
            }
            WorkerState::Starting | WorkerState::Running => {
                let Some(handle) = self.handle.as_ref() else {
                    self.state = WorkerState::Idle;
                    return false;
                };
                info!(worker = %handle.info.id, pid = %handle.info.pid, "Stopping worker");
                if handle.control.send(Control::Terminate).is_err() {
                    // Supervisor already finished; its exit event is queued.
                    debug!(worker = %handle.info.id, "supervisor gone before terminate request");
                }
                self.state = WorkerState::Stopping;
                true
            }
        }
    }

    /// Wait for the next event from the live worker.
    ///
    /// Pending forever while the slot is idle. Events left over from a
    /// previous worker are discarded.
    pub async fn next_event(&mut self) -> Option<WorkerEvent> {
        loop {
            let event = self.events_rx.recv().await?;
            let current = self.handle.as_ref().map(|h| h.info.id);
            if current != Some(event.worker()) {
                debug!(worker = %event.worker(), "discarding event from a previous worker");
                continue;
            }
            self.apply(&event);
            return Some(event);
        }
    }

    fn apply(&mut self, event: &WorkerEvent) {
        match event {
            WorkerEvent::HandshakeSent { .. } => {
                if self.state == WorkerState::Starting {
                    self.state = WorkerState::Running;
                }
            }
            WorkerEvent::HandshakeFailed { worker, error } => {
                warn!(%worker, %error, "Worker did not receive its start token");
            }
            WorkerEvent::Exited { worker, code } => {
                info!(%worker, code = ?code, "Worker slot released");
                self.handle = None;
                self.state = WorkerState::Idle;
            }
            WorkerEvent::Output { .. } => {}
        }
    }
}

impl std::fmt::Debug for WorkerProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerProcess")
            .field("command", &self.command)
            .field("state", &self.state)
            .field("info", &self.info())
            .finish_non_exhaustive()
    }
}
