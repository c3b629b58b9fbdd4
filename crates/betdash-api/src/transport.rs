//! Transport capability for the live-log stream.
//!
//! A transport opens one connection per request and reports everything that
//! happens on it (opened, message, errored, closed) as [`TransportEvent`]s
//! through an [`EventSink`]. The store that consumes the events never sees a
//! socket type, so tests can drive it with a scripted transport.

use std::fmt;

use tokio::sync::mpsc;
use url::Url;

/// Identifies one connection attempt. Assigned by the caller of
/// [`LogTransport::connect`], strictly increasing per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The id following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    /// Handshake completed.
    Opened,
    /// One inbound frame, decoded as UTF-8 text.
    Message(String),
    /// Transport-level failure. A `Closed` event follows.
    Errored(String),
    /// The connection is gone, whoever closed it.
    Closed,
}

/// A [`TransportEventKind`] tagged with the connection that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub connection: ConnectionId,
    pub kind: TransportEventKind,
}

impl TransportEvent {
    pub fn opened(connection: ConnectionId) -> Self {
        Self {
            connection,
            kind: TransportEventKind::Opened,
        }
    }

    pub fn message(connection: ConnectionId, payload: impl Into<String>) -> Self {
        Self {
            connection,
            kind: TransportEventKind::Message(payload.into()),
        }
    }

    pub fn errored(connection: ConnectionId, detail: impl Into<String>) -> Self {
        Self {
            connection,
            kind: TransportEventKind::Errored(detail.into()),
        }
    }

    pub fn closed(connection: ConnectionId) -> Self {
        Self {
            connection,
            kind: TransportEventKind::Closed,
        }
    }
}

/// Where a connection reports its events.
pub type EventSink = mpsc::UnboundedSender<TransportEvent>;

/// A live or pending connection. Receive-only: there is no send method.
pub trait LiveConnection {
    /// Request closure. Returns immediately; the transport reports
    /// [`TransportEventKind::Closed`] once the connection is gone.
    fn close(&mut self);
}

/// Something that can open live-log connections.
pub trait LogTransport {
    type Connection: LiveConnection;

    /// Start connecting to `url` and return the handle synchronously.
    ///
    /// Must not block on the handshake. All outcomes, including a failed
    /// handshake, arrive through `sink`.
    fn connect(&self, id: ConnectionId, url: &Url, sink: EventSink) -> Self::Connection;
}
