#![allow(clippy::unwrap_used)]
// End-to-end: `LiveLogStore` over the real WebSocket transport against a
// loopback server speaking the `/api/ws/logs` contract.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

use betdash_api::WebSocketTransport;
use betdash_core::{
    CONNECTED_MARKER, DISCONNECTED_MARKER, LinkState, LiveLogStore, PageLocation,
    TransportEventKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// Serve one client: check the request path, send `lines`, then close.
/// The returned receiver yields the path the client asked for.
async fn log_server(lines: Vec<&'static str>) -> (PageLocation, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (path_tx, path_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_hdr_async(stream, move |req: &Request, resp: Response| {
            let _ = path_tx.send(req.uri().path().to_owned());
            Ok::<_, ErrorResponse>(resp)
        })
        .await
        .unwrap();

        for line in lines {
            ws.send(Message::text(line)).await.unwrap();
        }
        ws.close(None).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    (PageLocation::new(false, addr.to_string()), path_rx)
}

async fn pump_until_closed(store: &mut LiveLogStore<WebSocketTransport>) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = store.pump().await {
            if event.kind == TransportEventKind::Closed {
                break;
            }
        }
    })
    .await
    .expect("stream did not close in time");
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_stream_lands_in_buffer_between_markers() {
    let (location, path_rx) = log_server(vec!["bot started", "placing bet on Rapid @ 1.85"]).await;
    let mut store = LiveLogStore::new(WebSocketTransport::new(), location);

    store.start_live();
    assert!(matches!(store.link_state(), LinkState::Connecting(_)));

    pump_until_closed(&mut store).await;

    assert_eq!(path_rx.await.unwrap(), "/api/ws/logs");
    assert_eq!(
        store.logs(),
        vec![
            CONNECTED_MARKER,
            "bot started",
            "placing bet on Rapid @ 1.85",
            DISCONNECTED_MARKER,
        ]
    );
    assert!(!store.is_live());
    assert!(!store.has_connection());
}

#[tokio::test]
async fn test_unreachable_backend_reports_error_then_disconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut store = LiveLogStore::new(
        WebSocketTransport::new(),
        PageLocation::new(false, addr.to_string()),
    );
    store.start_live();
    pump_until_closed(&mut store).await;

    let logs = store.logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].starts_with("[Error: "), "unexpected first entry: {}", logs[0]);
    assert_eq!(logs[1], DISCONNECTED_MARKER);
    assert!(!store.is_live());
}
