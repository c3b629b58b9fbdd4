// ── Live-log store ──
//
// Owns the log buffer, the live flag and at most one connection handle.
// Transport events arrive on an mpsc channel and are applied one at a time,
// so every mutation happens on the store's owner.

use betdash_api::{ConnectionId, LiveConnection, LogTransport, PageLocation, TransportEvent};
use tokio::sync::{mpsc, watch};

use super::buffer::{LogBuffer, LogCursor};
use super::state::{Command, Input, LinkMachine, LinkState, error_marker};

/// Live-log state for one consumer.
///
/// Constructed explicitly and owned by whoever renders the log panel; tests
/// build as many independent stores as they like. `logs` and `is_live` are
/// published through watch channels for reactive readers.
pub struct LiveLogStore<T: LogTransport> {
    transport: T,
    location: PageLocation,
    machine: LinkMachine,
    connection: Option<T::Connection>,
    next_id: ConnectionId,
    logs: watch::Sender<LogBuffer>,
    live: watch::Sender<bool>,
    events_tx: mpsc::UnboundedSender<TransportEvent>,
    events_rx: mpsc::UnboundedReceiver<TransportEvent>,
}

impl<T: LogTransport> LiveLogStore<T> {
    pub fn new(transport: T, location: PageLocation) -> Self {
        let (logs, _) = watch::channel(LogBuffer::new());
        let (live, _) = watch::channel(false);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            transport,
            location,
            machine: LinkMachine::new(),
            connection: None,
            next_id: ConnectionId::new(1),
            logs,
            live,
            events_tx,
            events_rx,
        }
    }

    // ── Buffer operations ────────────────────────────────────────────

    /// Append one entry, evicting the oldest past capacity.
    pub fn add_log(&self, entry: impl Into<String>) {
        let entry = entry.into();
        self.logs.send_modify(|buf| buf.push(entry));
    }

    /// Empty the buffer.
    pub fn clear_logs(&self) {
        self.logs.send_modify(LogBuffer::clear);
    }

    // ── Lifecycle operations ─────────────────────────────────────────

    /// Open the live-log connection unless a handle already exists.
    ///
    /// Returns as soon as the connection request is issued; the handshake is
    /// observed later through [`pump`](Self::pump) / [`apply`](Self::apply).
    pub fn start_live(&mut self) {
        if self.connection.is_some() {
            tracing::debug!(state = ?self.machine.state(), "Live logs already started");
            return;
        }

        let url = match self.location.log_stream_url() {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(location = %self.location, error = %e, "Cannot build live-log URL");
                self.add_log(error_marker(&e.to_string()));
                return;
            }
        };

        let id = self.next_id;
        let step = self.machine.step(Input::Start(id));
        self.machine = step.machine;

        if let Some(Command::Connect(id)) = step.command {
            tracing::info!(connection = %id, url = %url, "Starting live logs");
            self.connection = Some(self.transport.connect(id, &url, self.events_tx.clone()));
            self.next_id = id.next();
        }
        self.publish(step.append);
    }

    /// Close the connection, if any, without waiting for the remote.
    pub fn stop_live(&mut self) {
        let step = self.machine.step(Input::Stop);
        self.machine = step.machine;

        if let Some(Command::Close(id)) = step.command {
            tracing::info!(connection = %id, "Stopping live logs");
            if let Some(mut conn) = self.connection.take() {
                conn.close();
            }
        }
        self.connection = None;
        self.publish(step.append);
    }

    // ── Transport events ─────────────────────────────────────────────

    /// Apply one transport event.
    pub fn apply(&mut self, event: TransportEvent) {
        let step = self.machine.step(Input::Transport(event));
        self.machine = step.machine;

        if self.machine.state() == LinkState::Absent && self.connection.is_some() {
            self.connection = None;
        }
        self.publish(step.append);
    }

    /// Wait for the next transport event and apply it.
    ///
    /// Pending forever while no connection is producing events.
    pub async fn pump(&mut self) -> Option<TransportEvent> {
        let event = self.events_rx.recv().await?;
        self.apply(event.clone());
        Some(event)
    }

    /// Apply every event already queued, without waiting. Returns how many
    /// were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Live flag first, then the log line.
    fn publish(&self, append: Option<String>) {
        self.live.send_if_modified(|live| {
            let next = self.machine.state().is_live();
            let changed = *live != next;
            *live = next;
            changed
        });
        if let Some(line) = append {
            self.add_log(line);
        }
    }

    // ── Readers ──────────────────────────────────────────────────────

    /// Snapshot of the buffer, oldest first.
    pub fn logs(&self) -> Vec<String> {
        self.logs.borrow().to_vec()
    }

    /// Entries appended since `cursor` last read, advancing it.
    pub fn read_new(&self, cursor: &mut LogCursor) -> Vec<String> {
        cursor.take_new(&self.logs.borrow())
    }

    pub fn last_log(&self) -> Option<String> {
        self.logs.borrow().last().map(str::to_owned)
    }

    pub fn log_count(&self) -> usize {
        self.logs.borrow().len()
    }

    pub fn is_live(&self) -> bool {
        *self.live.borrow()
    }

    pub fn subscribe_logs(&self) -> watch::Receiver<LogBuffer> {
        self.logs.subscribe()
    }

    pub fn subscribe_live(&self) -> watch::Receiver<bool> {
        self.live.subscribe()
    }

    pub fn link_state(&self) -> LinkState {
        self.machine.state()
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::cell::RefCell;
    use std::rc::Rc;

    use betdash_api::{EventSink, TransportEventKind};
    use pretty_assertions::assert_eq;
    use url::Url;

    use super::*;
    use crate::live_log::{CONNECTED_MARKER, DISCONNECTED_MARKER, LOG_CAPACITY};

    // ── Scripted transport ───────────────────────────────────────────

    #[derive(Default)]
    struct Journal {
        connects: Vec<(ConnectionId, Url)>,
        closes: Vec<ConnectionId>,
        sinks: Vec<EventSink>,
    }

    #[derive(Clone, Default)]
    struct ScriptedTransport {
        journal: Rc<RefCell<Journal>>,
    }

    struct ScriptedConnection {
        id: ConnectionId,
        journal: Rc<RefCell<Journal>>,
    }

    impl LiveConnection for ScriptedConnection {
        fn close(&mut self) {
            self.journal.borrow_mut().closes.push(self.id);
        }
    }

    impl LogTransport for ScriptedTransport {
        type Connection = ScriptedConnection;

        fn connect(&self, id: ConnectionId, url: &Url, sink: EventSink) -> ScriptedConnection {
            let mut journal = self.journal.borrow_mut();
            journal.connects.push((id, url.clone()));
            journal.sinks.push(sink);
            ScriptedConnection {
                id,
                journal: Rc::clone(&self.journal),
            }
        }
    }

    fn store() -> (LiveLogStore<ScriptedTransport>, ScriptedTransport) {
        let transport = ScriptedTransport::default();
        let location = PageLocation::new(false, "localhost:8000");
        (LiveLogStore::new(transport.clone(), location), transport)
    }

    fn current(store: &LiveLogStore<ScriptedTransport>) -> ConnectionId {
        store.link_state().connection().unwrap()
    }

    // ── Buffer ───────────────────────────────────────────────────────

    #[test]
    fn add_log_respects_capacity() {
        let (store, _) = store();
        for i in 1..=1001 {
            let before = store.log_count();
            store.add_log(format!("entry {i}"));
            assert_eq!(store.log_count(), (before + 1).min(LOG_CAPACITY));
        }
        let logs = store.logs();
        assert_eq!(logs.len(), 1000);
        assert_eq!(logs.first().map(String::as_str), Some("entry 2"));
        assert_eq!(logs.last().map(String::as_str), Some("entry 1001"));
    }

    #[test]
    fn clear_logs_empties_buffer() {
        let (store, _) = store();
        store.add_log("a");
        store.add_log("b");
        store.clear_logs();
        assert_eq!(store.log_count(), 0);
    }

    #[test]
    fn read_new_returns_each_entry_once() {
        let (store, _) = store();
        let mut cursor = LogCursor::new();
        store.add_log("a");
        store.add_log("b");
        assert_eq!(store.read_new(&mut cursor), ["a", "b"]);
        assert!(store.read_new(&mut cursor).is_empty());
        store.add_log("c");
        assert_eq!(store.read_new(&mut cursor), ["c"]);
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    #[test]
    fn start_live_targets_log_endpoint() {
        let (mut store, transport) = store();
        store.start_live();

        let journal = transport.journal.borrow();
        assert_eq!(journal.connects.len(), 1);
        assert_eq!(journal.connects[0].1.as_str(), "ws://localhost:8000/api/ws/logs");
        assert!(matches!(store.link_state(), LinkState::Connecting(_)));
        assert!(!store.is_live());
    }

    #[test]
    fn secure_page_connects_with_wss() {
        let transport = ScriptedTransport::default();
        let mut store = LiveLogStore::new(transport.clone(), PageLocation::new(true, "bot.example"));
        store.start_live();
        assert_eq!(
            transport.journal.borrow().connects[0].1.as_str(),
            "wss://bot.example/api/ws/logs"
        );
    }

    #[test]
    fn start_live_twice_opens_one_connection() {
        let (mut store, transport) = store();
        store.start_live();
        let id = current(&store);
        store.apply(TransportEvent::opened(id));
        store.start_live();

        assert_eq!(transport.journal.borrow().connects.len(), 1);
        let markers = store.logs().iter().filter(|l| *l == CONNECTED_MARKER).count();
        assert_eq!(markers, 1);
    }

    #[test]
    fn stop_live_without_connection_is_harmless() {
        let (mut store, transport) = store();
        store.stop_live();
        assert!(!store.is_live());
        assert!(transport.journal.borrow().closes.is_empty());
        assert_eq!(store.log_count(), 0);
    }

    #[test]
    fn opened_event_sets_live_and_marks() {
        let (mut store, _) = store();
        store.start_live();
        store.apply(TransportEvent::opened(current(&store)));

        assert!(store.is_live());
        assert_eq!(store.last_log().as_deref(), Some(CONNECTED_MARKER));
    }

    #[test]
    fn inbound_frame_is_appended_verbatim() {
        let (mut store, _) = store();
        store.start_live();
        let id = current(&store);
        store.apply(TransportEvent::opened(id));
        store.apply(TransportEvent::message(id, "build started"));

        assert_eq!(store.last_log().as_deref(), Some("build started"));
    }

    #[test]
    fn remote_close_resets_and_allows_restart() {
        let (mut store, transport) = store();
        store.start_live();
        let first = current(&store);
        store.apply(TransportEvent::opened(first));
        store.apply(TransportEvent::closed(first));

        assert!(!store.is_live());
        assert_eq!(store.last_log().as_deref(), Some(DISCONNECTED_MARKER));
        assert!(!store.has_connection());

        store.start_live();
        let second = current(&store);
        assert_ne!(first, second);
        assert_eq!(transport.journal.borrow().connects.len(), 2);
    }

    #[test]
    fn stop_live_closes_and_clears_immediately() {
        let (mut store, transport) = store();
        store.start_live();
        let id = current(&store);
        store.apply(TransportEvent::opened(id));

        store.stop_live();
        assert!(!store.is_live());
        assert!(!store.has_connection());
        assert_eq!(transport.journal.borrow().closes, vec![id]);
        // No marker until the transport confirms.
        assert_eq!(store.last_log().as_deref(), Some(CONNECTED_MARKER));

        store.apply(TransportEvent::closed(id));
        assert_eq!(store.last_log().as_deref(), Some(DISCONNECTED_MARKER));
    }

    #[test]
    fn late_closes_from_restarted_connections_are_all_marked() {
        let (mut store, transport) = store();
        store.start_live();
        let first = current(&store);
        store.apply(TransportEvent::opened(first));
        store.stop_live();

        store.start_live();
        let second = current(&store);
        store.stop_live();

        store.start_live();
        let third = current(&store);
        assert_eq!(transport.journal.borrow().closes, vec![first, second]);

        store.apply(TransportEvent::closed(first));
        store.apply(TransportEvent::closed(second));

        let logs = store.logs();
        assert_eq!(
            logs,
            vec![CONNECTED_MARKER, DISCONNECTED_MARKER, DISCONNECTED_MARKER]
        );
        assert_eq!(store.link_state(), LinkState::Connecting(third));
        assert!(store.has_connection());
    }

    #[test]
    fn error_then_close_before_open() {
        let (mut store, _) = store();
        store.start_live();
        let id = current(&store);

        store.apply(TransportEvent::errored(id, "connection refused"));
        assert!(store.has_connection());
        assert_eq!(store.last_log().as_deref(), Some("[Error: connection refused]"));

        store.apply(TransportEvent::closed(id));
        assert!(!store.is_live());
        assert!(!store.has_connection());
        assert_eq!(
            store.logs(),
            vec!["[Error: connection refused]", DISCONNECTED_MARKER]
        );
    }

    #[test]
    fn queued_events_are_drained_in_order() {
        let (mut store, transport) = store();
        store.start_live();
        let id = current(&store);

        {
            let journal = transport.journal.borrow();
            let sink = &journal.sinks[0];
            sink.send(TransportEvent::opened(id)).unwrap();
            sink.send(TransportEvent::message(id, "one")).unwrap();
            sink.send(TransportEvent::message(id, "two")).unwrap();
        }

        assert_eq!(store.drain(), 3);
        assert_eq!(store.logs(), vec![CONNECTED_MARKER, "one", "two"]);
        assert!(store.is_live());
    }

    #[tokio::test]
    async fn pump_applies_next_event() {
        let (mut store, transport) = store();
        store.start_live();
        let id = current(&store);
        transport.journal.borrow().sinks[0]
            .send(TransportEvent::opened(id))
            .unwrap();

        let event = store.pump().await.unwrap();
        assert_eq!(event.kind, TransportEventKind::Opened);
        assert!(store.is_live());
    }

    #[test]
    fn watchers_see_updates() {
        let (mut store, _) = store();
        let logs_rx = store.subscribe_logs();
        let live_rx = store.subscribe_live();

        store.start_live();
        store.apply(TransportEvent::opened(current(&store)));

        assert!(*live_rx.borrow());
        assert_eq!(logs_rx.borrow().last(), Some(CONNECTED_MARKER));
    }

    #[test]
    fn independent_stores_do_not_share_state() {
        let (a, _) = store();
        let (b, _) = store();
        a.add_log("only in a");
        assert_eq!(a.log_count(), 1);
        assert_eq!(b.log_count(), 0);
    }
}
