//! Owning handle to the connection task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use super::connection::Outbound;
use super::messages::ClientCommand;
use crate::error::BoardError;
use crate::service::CommandSink;

/// How long [`ConnectionHandle::close`] waits for a graceful close before
/// aborting the task.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Handle to a running connection task.
///
/// The connection lives exactly as long as the handle: [`close`] shuts it
/// down gracefully and dropping the handle aborts the task.
///
/// [`close`]: ConnectionHandle::close
#[derive(Debug)]
pub struct ConnectionHandle {
    cmd_tx: mpsc::Sender<Outbound>,
    live: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ConnectionHandle {
    pub(crate) fn new(
        cmd_tx: mpsc::Sender<Outbound>,
        live: Arc<AtomicBool>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            cmd_tx,
            live,
            task: Some(task),
        }
    }

    /// Returns `true` while a WebSocket session is established.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Queues a command without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::CommandQueueFull`] when the queue is full and
    /// [`BoardError::ConnectionClosed`] when the task has stopped.
    pub fn send(&self, command: ClientCommand) -> Result<(), BoardError> {
        self.cmd_tx
            .try_send(Outbound::Command(command))
            .map_err(|e| match e {
                TrySendError::Full(_) => BoardError::CommandQueueFull,
                TrySendError::Closed(_) => BoardError::ConnectionClosed,
            })
    }

    /// Closes the WebSocket and waits for the task to finish.
    ///
    /// Falls back to aborting the task if it does not stop in time.
    pub async fn close(self) {
        self.close_within(CLOSE_GRACE).await;
    }

    async fn close_within(mut self, grace: Duration) {
        let Some(mut task) = self.task.take() else {
            return;
        };
        // The grace period covers queueing the close as well as the exit.
        let cmd_tx = &self.cmd_tx;
        let graceful = async {
            // A closed queue means the task is already finishing.
            let _ = cmd_tx.send(Outbound::Close).await;
            (&mut task).await
        };
        let outcome = tokio::time::timeout(grace, graceful).await;
        match outcome {
            Ok(Ok(())) => tracing::debug!("connection task stopped"),
            Ok(Err(e)) => tracing::warn!(error = %e, "connection task ended abnormally"),
            Err(_) => {
                tracing::warn!("connection task did not stop in time, aborting");
                task.abort();
            }
        }
        self.live.store(false, Ordering::SeqCst);
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl CommandSink for ConnectionHandle {
    fn is_connected(&self) -> bool {
        self.is_live()
    }

    fn dispatch(&self, command: ClientCommand) -> Result<(), BoardError> {
        self.send(command)
    }
}
