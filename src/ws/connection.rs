//! WebSocket connection task.
//!
//! [`connect`] spawns one task that owns the socket for the whole lifetime
//! of the returned [`ConnectionHandle`]. The task runs the read/write loop,
//! turns frames into [`ClientEvent`]s, and reconnects after a fixed delay
//! when the connection drops.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{FutureExt, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::handle::ConnectionHandle;
use super::messages::{ClientCommand, ServerPush};
use crate::config::BoardConfig;

/// Settings for the connection task.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// WebSocket endpoint.
    pub url: String,
    /// Fixed delay between reconnect attempts. `None` stops after the first
    /// loss or failed attempt.
    pub reconnect_delay: Option<Duration>,
    /// Capacity of the outbound command queue.
    pub command_buffer: usize,
    /// Capacity of the inbound event queue.
    pub event_buffer: usize,
}

impl From<&BoardConfig> for ConnectConfig {
    fn from(config: &BoardConfig) -> Self {
        Self {
            url: config.server_url.clone(),
            reconnect_delay: config.reconnect_delay,
            command_buffer: config.command_buffer,
            event_buffer: config.event_buffer,
        }
    }
}

/// Events the connection task emits for the board to consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The WebSocket handshake completed.
    Connected,
    /// The connection was lost or an attempt failed.
    Disconnected {
        /// Human-readable cause.
        reason: String,
    },
    /// A decoded server push.
    Push(ServerPush),
}

/// Requests from the handle to the connection task.
#[derive(Debug)]
pub(crate) enum Outbound {
    Command(ClientCommand),
    Close,
}

/// How a single WebSocket session ended.
#[derive(Debug)]
enum SessionEnd {
    /// Close was requested or the consumer went away.
    Shutdown,
    /// The connection was lost.
    Lost(String),
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens the connection in a spawned task.
///
/// Returns a handle for sending commands and a receiver for events. The
/// first event is either [`ClientEvent::Connected`] or
/// [`ClientEvent::Disconnected`].
#[must_use]
pub fn connect(config: ConnectConfig) -> (ConnectionHandle, mpsc::Receiver<ClientEvent>) {
    let (event_tx, event_rx) = mpsc::channel(config.event_buffer.max(1));
    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer.max(1));
    let live = Arc::new(AtomicBool::new(false));

    // wss:// needs a process-wide provider; an earlier install wins.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let task = tokio::spawn(run_client(config, Arc::clone(&live), event_tx, cmd_rx));

    (ConnectionHandle::new(cmd_tx, live, task), event_rx)
}

async fn run_client(
    config: ConnectConfig,
    live: Arc<AtomicBool>,
    event_tx: mpsc::Sender<ClientEvent>,
    mut cmd_rx: mpsc::Receiver<Outbound>,
) {
    loop {
        tracing::debug!(url = %config.url, "connecting");
        let reason = match guarded(tokio_tungstenite::connect_async(config.url.as_str())).await {
            Ok(Ok((socket, _response))) => {
                live.store(true, Ordering::SeqCst);
                tracing::info!(url = %config.url, "connected to event service");
                if event_tx.send(ClientEvent::Connected).await.is_err() {
                    live.store(false, Ordering::SeqCst);
                    return;
                }

                let end = guarded(run_connection(socket, &mut cmd_rx, &event_tx))
                    .await
                    .unwrap_or_else(|panic| SessionEnd::Lost(format!("session failed: {panic}")));
                live.store(false, Ordering::SeqCst);
                match end {
                    SessionEnd::Shutdown => {
                        tracing::debug!("ws connection closed");
                        return;
                    }
                    SessionEnd::Lost(reason) => {
                        tracing::warn!(%reason, "connection to event service lost");
                        reason
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %config.url, error = %e, "connection attempt failed");
                e.to_string()
            }
            Err(panic) => {
                tracing::error!(url = %config.url, %panic, "connection attempt panicked");
                format!("connection attempt failed: {panic}")
            }
        };

        if event_tx
            .send(ClientEvent::Disconnected { reason })
            .await
            .is_err()
        {
            return;
        }

        let Some(delay) = config.reconnect_delay else {
            return;
        };
        if !wait_for_retry(delay, &mut cmd_rx).await {
            return;
        }
    }
}

/// Polls `fut` to completion, turning a panic into its message so the task
/// can still report the loss and retry.
async fn guarded<F: Future>(fut: F) -> Result<F::Output, String> {
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Sleeps for `delay` while discarding commands. Returns `false` if close
/// was requested in the meantime.
async fn wait_for_retry(delay: Duration, cmd_rx: &mut mpsc::Receiver<Outbound>) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            () = &mut sleep => return true,
            cmd = cmd_rx.recv() => match cmd {
                Some(Outbound::Command(command)) => {
                    tracing::debug!(command = command.name(), "dropping command while disconnected");
                }
                Some(Outbound::Close) | None => return false,
            }
        }
    }
}

/// Runs the read/write loop for one WebSocket session.
///
/// - Reads pushes from the server and forwards them to the consumer.
/// - Writes commands from the handle to the server.
async fn run_connection(
    socket: Socket,
    cmd_rx: &mut mpsc::Receiver<Outbound>,
    event_tx: &mpsc::Sender<ClientEvent>,
) -> SessionEnd {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from the server
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let Some(push) = decode_push(text.as_str()) else {
                            continue;
                        };
                        if event_tx.send(ClientEvent::Push(push)).await.is_err() {
                            let _ = ws_tx.close().await;
                            return SessionEnd::Shutdown;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame
                            .map(|f| f.reason.as_str().to_owned())
                            .filter(|r| !r.is_empty())
                            .unwrap_or_else(|| "server closed the connection".to_string());
                        return SessionEnd::Lost(reason);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return SessionEnd::Lost(e.to_string()),
                    None => return SessionEnd::Lost("connection closed".to_string()),
                }
            }
            // Command from the handle
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Outbound::Command(command)) => {
                        let json = match serde_json::to_string(&command) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::warn!(command = command.name(), error = %e, "failed to encode command");
                                continue;
                            }
                        };
                        if let Err(e) = ws_tx.send(Message::text(json)).await {
                            return SessionEnd::Lost(e.to_string());
                        }
                        tracing::debug!(command = command.name(), "command sent");
                    }
                    Some(Outbound::Close) | None => {
                        let _ = ws_tx.close().await;
                        return SessionEnd::Shutdown;
                    }
                }
            }
        }
    }
}

/// Decodes one text frame, logging and skipping anything malformed.
fn decode_push(text: &str) -> Option<ServerPush> {
    match serde_json::from_str::<ServerPush>(text) {
        Ok(push) => {
            tracing::debug!(push = push.name(), "push received");
            Some(push)
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed push");
            None
        }
    }
}
