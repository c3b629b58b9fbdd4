// betdash-core: route table and live-log store between betdash-api and consumers (CLI).

pub mod config;
pub mod error;
pub mod live_log;
pub mod router;
pub mod views;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_DASHBOARD_URL, DEFAULT_TIMEOUT_SECS, DashboardConfig};
pub use error::CoreError;
pub use live_log::{
    CONNECTED_MARKER, DISCONNECTED_MARKER, LOG_CAPACITY, LinkState, LiveLogStore, LogBuffer,
    LogCursor,
};
pub use router::{ROUTES, Resolved, RouteEntry, RouteTable, Router, ViewId, ViewLoader};
pub use views::{BuiltinViews, ViewSpec};

// The wire types consumers need to build a store or fetch view data.
pub use betdash_api::{
    ConnectionId, DashboardClient, Health, PageLocation, TransportEvent, TransportEventKind,
    WebSocketTransport,
};
