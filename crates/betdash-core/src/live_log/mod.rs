// ── Live-log store ──
//
// Bounded log buffer fed by one live-log connection at a time. The
// connection lifecycle is a pure state machine (`state`); the store applies
// its steps against a transport and publishes results through watch channels.

mod buffer;
pub mod state;
mod store;

pub use buffer::{LOG_CAPACITY, LogBuffer, LogCursor};
pub use state::{CONNECTED_MARKER, DISCONNECTED_MARKER, LinkState};
pub use store::LiveLogStore;
