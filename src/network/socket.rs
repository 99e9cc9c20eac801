use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::common::{ClientEvent, NetworkEvent, wire};
use crate::error::{Error, Result};

use super::transport::{SocketStream, open_socket};

const CLOSE_GRACE: Duration = Duration::from_secs(2);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A live socket connection. Dropping the outbound sender closes it.
pub struct ConnectionHandle {
    outbound: mpsc::UnboundedSender<ClientEvent>,
    task: JoinHandle<()>,
}

impl ConnectionHandle {
    pub fn is_alive(&self) -> bool {
        !self.task.is_finished() && !self.outbound.is_closed()
    }
}

/// Realtime transport client. Inbound frames are forwarded to `event_sender`
/// as [`NetworkEvent::Server`] in arrival order.
pub struct SocketClient {
    socket_url: String,
    event_sender: mpsc::Sender<NetworkEvent>,
    connect_timeout: Duration,
    handle: Option<ConnectionHandle>,
}

impl SocketClient {
    pub fn new(socket_url: impl Into<String>, event_sender: mpsc::Sender<NetworkEvent>) -> Self {
        Self {
            socket_url: socket_url.into(),
            event_sender,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            handle: None,
        }
    }

    /// Bound on the TCP connect plus websocket handshake.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.handle.as_ref().is_some_and(ConnectionHandle::is_alive)
    }

    /// Open the connection, or return the existing one.
    pub async fn connect(&mut self, token: &str) -> Result<&ConnectionHandle> {
        if !self.is_connected() {
            let stream = tokio::time::timeout(self.connect_timeout, open_socket(&self.socket_url, token))
                .await
                .map_err(|_| Error::ConnectTimeout(self.socket_url.clone()))??;
            let (outbound, outbound_rx) = mpsc::unbounded_channel();
            let task = tokio::spawn(pump(stream, outbound_rx, self.event_sender.clone()));
            log::info!("Realtime socket connected to {}", self.socket_url);
            self.handle = Some(ConnectionHandle { outbound, task });
        }
        self.handle
            .as_ref()
            .ok_or(Error::Transport(tungstenite::Error::AlreadyClosed))
    }

    /// Close the connection and drop the handle. Safe to call when idle.
    pub async fn disconnect(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let ConnectionHandle { outbound, mut task } = handle;
        drop(outbound);
        match tokio::time::timeout(CLOSE_GRACE, &mut task).await {
            Ok(Err(err)) => log::debug!("Socket task ended abnormally: {err}"),
            Ok(Ok(())) => {}
            Err(_) => {
                log::warn!("Socket did not close in time; aborting");
                task.abort();
            }
        }
        log::info!("Realtime socket disconnected");
    }

    /// Best-effort send. Without a live connection this is a no-op.
    pub fn emit(&self, event: ClientEvent) {
        match &self.handle {
            Some(handle) if handle.is_alive() => {
                if handle.outbound.send(event).is_err() {
                    log::debug!("Socket closed while emitting; event dropped");
                }
            }
            _ => log::debug!("No socket connection; dropping `{}`", event.name()),
        }
    }
}

/// Shuttle frames between the socket and the channels until either side closes.
async fn pump(
    stream: SocketStream,
    mut outbound: mpsc::UnboundedReceiver<ClientEvent>,
    event_sender: mpsc::Sender<NetworkEvent>,
) {
    let (mut sink, mut source) = stream.split();
    let _ = event_sender
        .send(NetworkEvent::ConnectionChanged { connected: true })
        .await;

    loop {
        tokio::select! {
            event = outbound.recv() => {
                let Some(event) = event else {
                    if let Err(err) = sink.send(Message::Close(None)).await {
                        log::debug!("Failed to send close frame: {err}");
                    }
                    break;
                };
                match wire::encode(&event) {
                    Ok(frame) => {
                        if let Err(err) = sink.send(Message::text(frame)).await {
                            log::warn!("Socket write failed: {err}");
                            break;
                        }
                    }
                    Err(err) => log::warn!("Failed to encode `{}`: {err}", event.name()),
                }
            }
            frame = source.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match wire::decode(text.as_str()) {
                        Ok(event) => {
                            if event_sender.send(NetworkEvent::Server(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => log::debug!("Skipping unrecognised frame: {err}"),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        log::warn!("Socket read failed: {err}");
                        break;
                    }
                }
            }
        }
    }

    let _ = event_sender
        .send(NetworkEvent::ConnectionChanged { connected: false })
        .await;
}
