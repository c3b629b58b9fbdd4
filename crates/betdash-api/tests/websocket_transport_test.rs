#![allow(clippy::unwrap_used)]
// Drives `WebSocketTransport` against a loopback tokio-tungstenite server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use betdash_api::{
    ConnectionId, LiveConnection, LogTransport, TransportEvent, TransportEventKind,
    WebSocketTransport,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// Accept one socket, send `lines`, then either close or hold the socket open
/// until the client closes it.
async fn serve_once(lines: Vec<&'static str>, close_after: bool) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        for line in lines {
            ws.send(Message::text(line)).await.unwrap();
        }
        if close_after {
            ws.close(None).await.unwrap();
        }
        // Drain until the client goes away.
        while let Some(Ok(_)) = ws.next().await {}
    });

    Url::parse(&format!("ws://{addr}/api/ws/logs")).unwrap()
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<TransportEvent>) -> TransportEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for transport event")
        .expect("event channel closed")
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_frames_arrive_between_open_and_close() {
    let url = serve_once(vec!["build started", "build finished"], true).await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = ConnectionId::new(1);

    let _conn = WebSocketTransport::new().connect(id, &url, tx);

    assert_eq!(next_event(&mut rx).await, TransportEvent::opened(id));
    assert_eq!(next_event(&mut rx).await, TransportEvent::message(id, "build started"));
    assert_eq!(next_event(&mut rx).await, TransportEvent::message(id, "build finished"));
    assert_eq!(next_event(&mut rx).await, TransportEvent::closed(id));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_local_close_reports_closed() {
    let url = serve_once(vec!["hello"], false).await;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = ConnectionId::new(2);

    let mut conn = WebSocketTransport::new().connect(id, &url, tx);

    assert_eq!(next_event(&mut rx).await.kind, TransportEventKind::Opened);
    assert_eq!(next_event(&mut rx).await, TransportEvent::message(id, "hello"));

    conn.close();
    assert_eq!(next_event(&mut rx).await, TransportEvent::closed(id));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refused_connection_errors_then_closes() {
    // Bind and drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("ws://{addr}/api/ws/logs")).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = ConnectionId::new(3);

    let _conn = WebSocketTransport::new().connect(id, &url, tx);

    let first = next_event(&mut rx).await;
    assert!(
        matches!(first.kind, TransportEventKind::Errored(ref detail) if !detail.is_empty()),
        "expected an error event, got {first:?}"
    );
    assert_eq!(next_event(&mut rx).await, TransportEvent::closed(id));
}
