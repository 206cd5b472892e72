//! Host lifecycle wiring.
//!
//! `ShellController` ties the credential store, the worker slot and the UI
//! sink together. The host calls [`ShellController::on_credentials_submitted`]
//! when the user submits the form, keeps [`ShellController::pump`] running to
//! relay worker output, and calls [`ShellController::on_app_exit`] on quit.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use recshell_core::{Credentials, ShellEvent, ShellSettings, UiEventSink};
use thiserror::Error;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, info, warn};

use crate::credentials::{CredentialError, CredentialStore};
use crate::process::{
    HandshakePolicy, StartOutcome, WorkerCommand, WorkerError, WorkerEvent, WorkerProcess,
};
use crate::relay::ProgressRelay;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Worker(#[from] WorkerError),
}

pub struct ShellController {
    store: CredentialStore,
    worker: WorkerProcess,
    relay: ProgressRelay,
    sink: Arc<dyn UiEventSink>,
}

impl ShellController {
    pub fn new(store: CredentialStore, worker: WorkerProcess, sink: Arc<dyn UiEventSink>) -> Self {
        Self {
            store,
            worker,
            relay: ProgressRelay::new(),
            sink,
        }
    }

    /// Build the store and worker described by `settings`.
    pub fn from_settings(settings: &ShellSettings, sink: Arc<dyn UiEventSink>) -> Self {
        let command = WorkerCommand::python_script(
            &settings.interpreter,
            &settings.script_path,
            settings.data_dir(),
        );
        let worker = WorkerProcess::new(command)
            .with_handshake(HandshakePolicy::after_delay(settings.handshake_delay()))
            .with_shutdown_grace(settings.shutdown_grace());

        Self::new(CredentialStore::new(settings.data_dir()), worker, sink)
    }

    pub const fn worker(&self) -> &WorkerProcess {
        &self.worker
    }

    pub const fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Persist `creds` and start the worker.
    ///
    /// Every outcome is also reported to the UI sink. A failed write leaves
    /// the worker untouched. Submitting while a worker is live rewrites the
    /// file and reports `AlreadyRunning`.
    pub fn on_credentials_submitted(
        &mut self,
        creds: Credentials,
    ) -> Result<StartOutcome, ShellError> {
        if let Err(e) = self.store.write(&creds) {
            error!(error = %e, "Failed to save credentials");
            self.sink.emit(ShellEvent::failed(format!("Failed to save credentials: {e}")));
            return Err(e.into());
        }

        match self.worker.start() {
            Ok(StartOutcome::Started { pid }) => {
                let started_at = self
                    .worker
                    .info()
                    .map_or_else(Utc::now, |info| info.started_at);
                self.sink.emit(ShellEvent::WorkerStarted { pid, started_at });
                Ok(StartOutcome::Started { pid })
            }
            Ok(StartOutcome::AlreadyRunning) => {
                self.sink.emit(ShellEvent::WorkerAlreadyRunning);
                Ok(StartOutcome::AlreadyRunning)
            }
            Err(e) => {
                error!(error = %e, "Failed to start worker");
                self.sink.emit(ShellEvent::failed(format!("Failed to start worker: {e}")));
                Err(e.into())
            }
        }
    }

    /// Wait for the next worker event and forward it to the UI.
    ///
    /// Pending while no worker is live; use it inside `select!`.
    pub async fn pump(&mut self) -> Option<WorkerEvent> {
        let event = self.worker.next_event().await?;
        self.forward(&event);
        Some(event)
    }

    fn forward(&self, event: &WorkerEvent) {
        match event {
            WorkerEvent::Output { channel, text, .. } => {
                self.sink.emit(self.relay.classify(*channel, text).into());
            }
            WorkerEvent::HandshakeSent { worker } => {
                debug!(%worker, "worker acknowledged start");
            }
            WorkerEvent::HandshakeFailed { error, .. } => {
                self.sink.emit(ShellEvent::failed(format!(
                    "Failed to send start command to worker: {error}"
                )));
            }
            WorkerEvent::Exited { code, .. } => {
                self.sink.emit(ShellEvent::WorkerExited { code: *code });
            }
        }
    }

    /// Stop the worker and remove the credentials.
    ///
    /// Never fails: nothing running and nothing on disk are both fine, and
    /// removal errors are logged.
    pub fn on_app_exit(&mut self) {
        if self.worker.stop() {
            info!("Termination requested for running worker");
        }

        match self.store.clear() {
            Ok(true) => info!(path = %self.store.path().display(), "Credentials cleared"),
            Ok(false) => debug!("No credentials to clear"),
            Err(e) => warn!(error = %e, "Failed to clear credentials"),
        }
    }

    /// [`Self::on_app_exit`], then relay events until the worker is gone.
    ///
    /// A worker may still write its token cache during its grace period, so
    /// the files are cleared once more after it exits. Returns `true` if the
    /// worker exited within `limit`.
    pub async fn shutdown(&mut self, limit: Duration) -> bool {
        self.on_app_exit();
        if !self.drain(limit).await {
            return false;
        }
        match self.store.clear() {
            Ok(true) => info!("Removed files written by the worker during shutdown"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to clear credentials after shutdown"),
        }
        true
    }

    /// Relay events until the worker slot is idle or `limit` elapses.
    ///
    /// Returns `true` if the slot is idle.
    pub async fn drain(&mut self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while self.worker.is_running() {
            match timeout_at(deadline, self.pump()).await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => {
                    warn!(timeout_ms = %limit.as_millis(), "Worker still running after drain timeout");
                    return false;
                }
            }
        }
        !self.worker.is_running()
    }
}

impl std::fmt::Debug for ShellController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellController")
            .field("store", &self.store)
            .field("worker", &self.worker)
            .finish_non_exhaustive()
    }
}
