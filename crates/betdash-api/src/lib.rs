// betdash-api: wire layer for the betdash dashboard client (live-log socket + REST view data)

pub mod endpoint;
pub mod error;
pub mod rest;
pub mod transport;
pub mod websocket;

pub use endpoint::{LOG_STREAM_PATH, PageLocation};
pub use error::Error;
pub use rest::{DashboardClient, Health};
pub use transport::{
    ConnectionId, EventSink, LiveConnection, LogTransport, TransportEvent, TransportEventKind,
};
pub use websocket::{WebSocketConnection, WebSocketTransport};
