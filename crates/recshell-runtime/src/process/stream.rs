//! Async stream line readers (non-UTF8-safe).
//!
//! Worker scripts can emit non-UTF8 bytes (progress bars, terminal colour
//! codes cut mid-sequence). `BufReader::lines()` would end the reader task on
//! invalid UTF-8, so lines are read as bytes and decoded lossily.

use recshell_core::OutputChannel;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use super::events::WorkerEvent;
use super::types::WorkerId;

/// Fires once when a line starting with `marker` is read.
pub(crate) struct ReadyProbe {
    pub marker: String,
    pub notify: oneshot::Sender<()>,
}

pub(crate) fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    worker: WorkerId,
    channel: OutputChannel,
    events: mpsc::UnboundedSender<WorkerEvent>,
    mut ready: Option<ReadyProbe>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    // Trim trailing newline(s)
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }

                    let line = String::from_utf8_lossy(&buf).to_string();
                    debug!(%worker, stream_type = %channel, "{}", line);

                    if ready.as_ref().is_some_and(|p| line.starts_with(&p.marker)) {
                        if let Some(probe) = ready.take() {
                            let _ = probe.notify.send(());
                        }
                    }

                    let event = WorkerEvent::Output {
                        worker,
                        channel,
                        text: line,
                    };
                    if events.send(event).is_err() {
                        debug!(%worker, stream_type = %channel, "event receiver dropped, stopping reader");
                        break;
                    }
                }
                Err(e) => {
                    debug!(%worker, stream_type = %channel, error = %e, "stream reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(%worker, stream_type = %channel, "stream reader task exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(events: &mut mpsc::UnboundedReceiver<WorkerEvent>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let WorkerEvent::Output { text, .. } = event {
                out.push(text);
            }
        }
        out
    }

    #[tokio::test]
    async fn test_reader_splits_and_trims_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"first\r\nsecond\nno newline";
        spawn_stream_reader(input, WorkerId(1), OutputChannel::Stdout, tx, None)
            .await
            .unwrap();

        assert_eq!(lines(&mut rx), vec!["first", "second", "no newline"]);
    }

    #[tokio::test]
    async fn test_reader_survives_invalid_utf8() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"bad \xff byte\nafter\n";
        spawn_stream_reader(input, WorkerId(1), OutputChannel::Stderr, tx, None)
            .await
            .unwrap();

        let got = lines(&mut rx);
        assert_eq!(got.len(), 2);
        assert!(got[0].starts_with("bad "));
        assert_eq!(got[1], "after");
    }

    #[tokio::test]
    async fn test_reader_fires_ready_probe_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (notify, ready) = oneshot::channel();
        let probe = ReadyProbe {
            marker: "Awaiting".to_string(),
            notify,
        };
        let input: &[u8] = b"booting\nAwaiting commands...\nAwaiting again\n";
        spawn_stream_reader(input, WorkerId(7), OutputChannel::Stdout, tx, Some(probe))
            .await
            .unwrap();

        assert!(ready.await.is_ok());
        assert_eq!(lines(&mut rx).len(), 3);
    }
}
