//! Live-log stream over a WebSocket.
//!
//! Each [`WebSocketTransport::connect`] call spawns one background task that
//! performs the handshake, forwards every inbound frame as a log line and
//! reports the connection's lifecycle through the event sink. There is no
//! reconnection: when the socket goes away the task reports `Closed` and
//! exits.
//!
//! # Example
//!
//! ```rust,ignore
//! use betdash_api::{ConnectionId, LogTransport, WebSocketTransport};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let url = url::Url::parse("ws://localhost:8000/api/ws/logs")?;
//! let _conn = WebSocketTransport::new().connect(ConnectionId::default(), &url, tx);
//!
//! while let Some(event) = rx.recv().await {
//!     println!("{:?}", event.kind);
//! }
//! ```

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::transport::{ConnectionId, EventSink, LiveConnection, LogTransport, TransportEvent};

// ── WebSocketTransport ───────────────────────────────────────────────

/// Opens live-log connections with tokio-tungstenite.
///
/// Must be used from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    _priv: (),
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSocketTransport {
    pub fn new() -> Self {
        // Another provider may already be installed; either way wss works.
        let _ = rustls::crypto::ring::default_provider().install_default();
        Self { _priv: () }
    }
}

impl LogTransport for WebSocketTransport {
    type Connection = WebSocketConnection;

    fn connect(&self, id: ConnectionId, url: &Url, sink: EventSink) -> WebSocketConnection {
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        let url = url.clone();
        tokio::spawn(async move {
            run_connection(id, url, sink, task_cancel).await;
        });

        WebSocketConnection { id, cancel }
    }
}

// ── WebSocketConnection ──────────────────────────────────────────────

/// Handle to one spawned connection task.
///
/// Dropping the handle closes the connection.
#[derive(Debug)]
pub struct WebSocketConnection {
    id: ConnectionId,
    cancel: CancellationToken,
}

impl WebSocketConnection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl LiveConnection for WebSocketConnection {
    fn close(&mut self) {
        self.cancel.cancel();
    }
}

impl Drop for WebSocketConnection {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Connection task ──────────────────────────────────────────────────

/// Drive one connection to completion. Always ends with a `Closed` event.
async fn run_connection(id: ConnectionId, url: Url, sink: EventSink, cancel: CancellationToken) {
    if let Err(e) = connect_and_read(id, &url, &sink, &cancel).await {
        tracing::warn!(connection = %id, error = %e, "Live-log socket error");
        let _ = sink.send(TransportEvent::errored(id, e.to_string()));
    }

    tracing::info!(connection = %id, "Live-log socket closed");
    // The receiver may already be gone if the store was dropped.
    let _ = sink.send(TransportEvent::closed(id));
}

/// Handshake, then forward frames until either side closes.
async fn connect_and_read(
    id: ConnectionId,
    url: &Url,
    sink: &EventSink,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(connection = %id, url = %url, "Connecting to live-log socket");

    let uri: tungstenite::http::Uri = url
        .as_str()
        .parse()
        .map_err(|e: tungstenite::http::uri::InvalidUri| Error::WebSocketConnect(e.to_string()))?;

    let handshake = tokio_tungstenite::connect_async(ClientRequestBuilder::new(uri));
    let (mut ws, _response) = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ok(()),
        result = handshake => result.map_err(|e| Error::WebSocketConnect(e.to_string()))?,
    };

    tracing::info!(connection = %id, "Live-log socket connected");
    let _ = sink.send(TransportEvent::opened(id));

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                if let Err(e) = ws.close(None).await {
                    tracing::debug!(connection = %id, error = %e, "Close handshake failed");
                }
                return Ok(());
            }
            frame = ws.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        let _ = sink.send(TransportEvent::message(id, text.as_str()));
                    }
                    Some(Ok(tungstenite::Message::Binary(bytes))) => {
                        let line = String::from_utf8_lossy(&bytes).into_owned();
                        let _ = sink.send(TransportEvent::message(id, line));
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite answers pings itself
                        tracing::trace!(connection = %id, "Live-log socket ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        if let Some(ref cf) = frame {
                            tracing::info!(
                                connection = %id,
                                code = %cf.code,
                                reason = %cf.reason,
                                "Close frame received"
                            );
                        } else {
                            tracing::info!(connection = %id, "Close frame received (no payload)");
                        }
                        return Ok(());
                    }
                    Some(Err(e)) => return Err(Error::WebSocketRead(e.to_string())),
                    None => {
                        tracing::info!(connection = %id, "Live-log stream ended");
                        return Ok(());
                    }
                    _ => {
                        // Pong, raw Frame -- nothing to log
                    }
                }
            }
        }
    }
}
