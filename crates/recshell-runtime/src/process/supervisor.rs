//! Per-worker supervisor task.
//!
//! The supervisor owns the `Child` and its stdin. It sends the handshake,
//! performs termination on request, and reports the exit once the output
//! readers have drained.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::events::WorkerEvent;
use super::handshake::{HANDSHAKE_TOKEN, HandshakePolicy};
use super::shutdown::shutdown_child;
use super::types::WorkerId;

/// Upper bound on waiting for output readers after the process exited.
///
/// A grandchild holding the pipes open must not delay the exit event forever.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Requests from the owning `WorkerProcess`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Terminate,
}

type ReadyFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

pub(crate) struct Supervisor {
    pub id: WorkerId,
    pub child: Child,
    pub stdin: ChildStdin,
    pub ready: ReadyFuture,
    pub shutdown_grace: Duration,
    pub readers: Vec<JoinHandle<()>>,
    pub events: mpsc::UnboundedSender<WorkerEvent>,
    pub control: mpsc::UnboundedReceiver<Control>,
}

/// Build the future that resolves when the handshake may be sent.
pub(crate) fn ready_future(
    policy: &HandshakePolicy,
    ready_signal: Option<oneshot::Receiver<()>>,
) -> ReadyFuture {
    match (policy, ready_signal) {
        (HandshakePolicy::OnReadyLine { timeout: limit, .. }, Some(signal)) => {
            let limit = *limit;
            Box::pin(async move {
                // Err covers both the timeout and a closed stdout.
                let _ = timeout(limit, signal).await;
            })
        }
        (policy, _) => Box::pin(sleep(policy.max_wait())),
    }
}

impl Supervisor {
    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let mut handshake_pending = true;

        let status = loop {
            tokio::select! {
                status = self.child.wait() => break status,
                () = &mut self.ready, if handshake_pending => {
                    handshake_pending = false;
                    self.send_handshake().await;
                }
                request = self.control.recv() => {
                    // `None` means the owner is gone; shut down all the same.
                    debug!(worker = %self.id, ?request, "terminating worker");
                    break shutdown_child(&mut self.child, self.shutdown_grace).await;
                }
            }
        };

        self.drain_readers().await;

        let code = match status {
            Ok(status) => {
                info!(worker = %self.id, ?status, "worker exited");
                status.code()
            }
            Err(e) => {
                warn!(worker = %self.id, error = %e, "failed to reap worker");
                None
            }
        };

        let _ = self.events.send(WorkerEvent::Exited {
            worker: self.id,
            code,
        });
    }

    async fn send_handshake(&mut self) {
        let result = async {
            self.stdin.write_all(HANDSHAKE_TOKEN.as_bytes()).await?;
            self.stdin.flush().await
        }
        .await;

        let event = match result {
            Ok(()) => {
                debug!(worker = %self.id, "handshake sent");
                WorkerEvent::HandshakeSent { worker: self.id }
            }
            Err(e) => {
                warn!(worker = %self.id, error = %e, "failed to write handshake to worker stdin");
                WorkerEvent::HandshakeFailed {
                    worker: self.id,
                    error: e.to_string(),
                }
            }
        };
        let _ = self.events.send(event);
    }

    async fn drain_readers(&mut self) {
        for reader in self.readers.drain(..) {
            if timeout(READER_DRAIN_TIMEOUT, reader).await.is_err() {
                warn!(worker = %self.id, "output reader did not finish after exit; leaving it detached");
            }
        }
    }
}
