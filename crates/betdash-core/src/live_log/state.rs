//! Connection lifecycle as a pure transition function.
//!
//! [`LinkMachine::step`] takes the current machine and one [`Input`] and
//! returns the next machine, the log line to append (if any) and the command
//! the store must issue against its transport (if any). Nothing here touches
//! a socket, so every transition is testable in isolation.

use std::collections::BTreeSet;

use betdash_api::{ConnectionId, TransportEvent, TransportEventKind};

/// Appended when the stream is established.
pub const CONNECTED_MARKER: &str = "[Connected to live logs]";

/// Appended when the stream goes away.
pub const DISCONNECTED_MARKER: &str = "[Disconnected from live logs]";

/// Marker for a transport error.
pub fn error_marker(detail: &str) -> String {
    format!("[Error: {detail}]")
}

// ── LinkState ────────────────────────────────────────────────────────

/// Lifecycle of the store's single connection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No handle.
    #[default]
    Absent,
    /// Handle created, handshake not finished.
    Connecting(ConnectionId),
    /// Stream established.
    Open(ConnectionId),
}

impl LinkState {
    /// The connection owning the handle, if any.
    pub fn connection(self) -> Option<ConnectionId> {
        match self {
            Self::Absent => None,
            Self::Connecting(id) | Self::Open(id) => Some(id),
        }
    }

    /// The live flag: true only while open.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Open(_))
    }
}

// ── Inputs and outputs ───────────────────────────────────────────────

/// Something that can move the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Consumer asked to go live; `ConnectionId` is the id a new connection
    /// would get.
    Start(ConnectionId),
    /// Consumer asked to stop.
    Stop,
    /// The transport reported something.
    Transport(TransportEvent),
}

/// Work the store must do against its transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect(ConnectionId),
    Close(ConnectionId),
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub machine: LinkMachine,
    pub append: Option<String>,
    pub command: Option<Command>,
}

// ── LinkMachine ──────────────────────────────────────────────────────

/// Link state plus the connections that were stopped locally and have not
/// reported `Closed` yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkMachine {
    state: LinkState,
    draining: BTreeSet<ConnectionId>,
}

impl LinkMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Whether `id` was stopped and its `Closed` event is still pending.
    pub fn is_draining(&self, id: ConnectionId) -> bool {
        self.draining.contains(&id)
    }

    /// Number of stopped connections still waiting for `Closed`.
    pub fn draining_count(&self) -> usize {
        self.draining.len()
    }

    #[must_use]
    pub fn step(&self, input: Input) -> Step {
        match input {
            Input::Start(id) => self.start(id),
            Input::Stop => self.stop(),
            Input::Transport(event) => self.on_transport(event),
        }
    }

    fn start(&self, id: ConnectionId) -> Step {
        match self.state {
            LinkState::Absent => Step {
                machine: Self {
                    state: LinkState::Connecting(id),
                    draining: self.draining.clone(),
                },
                append: None,
                command: Some(Command::Connect(id)),
            },
            // Already connecting or open.
            LinkState::Connecting(_) | LinkState::Open(_) => self.unchanged(),
        }
    }

    fn stop(&self) -> Step {
        match self.state.connection() {
            Some(id) => {
                let mut draining = self.draining.clone();
                draining.insert(id);
                Step {
                    machine: Self {
                        state: LinkState::Absent,
                        draining,
                    },
                    append: None,
                    command: Some(Command::Close(id)),
                }
            }
            None => self.unchanged(),
        }
    }

    fn on_transport(&self, event: TransportEvent) -> Step {
        let TransportEvent { connection, kind } = event;

        if self.state.connection() == Some(connection) {
            return self.on_current(connection, kind);
        }
        if self.draining.contains(&connection) {
            return self.on_draining(connection, kind);
        }
        tracing::debug!(connection = %connection, ?kind, "Dropping event from unknown connection");
        self.unchanged()
    }

    fn on_current(&self, id: ConnectionId, kind: TransportEventKind) -> Step {
        match (self.state, kind) {
            (LinkState::Connecting(_), TransportEventKind::Opened) => Step {
                machine: Self {
                    state: LinkState::Open(id),
                    draining: self.draining.clone(),
                },
                append: Some(CONNECTED_MARKER.to_owned()),
                command: None,
            },
            (LinkState::Open(_), TransportEventKind::Message(payload)) => Step {
                machine: self.clone(),
                append: Some(payload),
                command: None,
            },
            (_, TransportEventKind::Errored(detail)) => Step {
                machine: self.clone(),
                append: Some(error_marker(&detail)),
                command: None,
            },
            // Also reached when the handshake failed: the flag was never set,
            // but the disconnect marker is still appended.
            (_, TransportEventKind::Closed) => Step {
                machine: Self {
                    state: LinkState::Absent,
                    draining: self.draining.clone(),
                },
                append: Some(DISCONNECTED_MARKER.to_owned()),
                command: None,
            },
            (state, kind) => {
                tracing::debug!(?state, ?kind, "Ignoring out-of-order transport event");
                self.unchanged()
            }
        }
    }

    /// A stopped connection only gets to narrate its own shutdown.
    fn on_draining(&self, id: ConnectionId, kind: TransportEventKind) -> Step {
        match kind {
            TransportEventKind::Errored(detail) => Step {
                machine: self.clone(),
                append: Some(error_marker(&detail)),
                command: None,
            },
            TransportEventKind::Closed => {
                let mut draining = self.draining.clone();
                draining.remove(&id);
                Step {
                    machine: Self {
                        state: self.state,
                        draining,
                    },
                    append: Some(DISCONNECTED_MARKER.to_owned()),
                    command: None,
                }
            }
            TransportEventKind::Opened | TransportEventKind::Message(_) => self.unchanged(),
        }
    }

    fn unchanged(&self) -> Step {
        Step {
            machine: self.clone(),
            append: None,
            command: None,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
