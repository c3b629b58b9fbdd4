//! `betdash logs`: follow the bot's live-log stream.
//!
//! Drives a `LiveLogStore` over the real WebSocket transport and prints each
//! new buffer entry as it lands. Ctrl-C or `--count` stops the stream.

use std::io::{self, Write};
use std::time::Duration;

use betdash_core::{
    DashboardConfig, LinkState, LiveLogStore, LogCursor, TransportEventKind, WebSocketTransport,
};

use crate::cli::{GlobalOpts, LogsArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

/// How long to wait for the close handshake after a local stop.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Prints buffer entries the cursor has not seen yet.
struct LogPrinter {
    cursor: LogCursor,
    color: bool,
    markers: bool,
    /// Print each line as a JSON string.
    json: bool,
    /// Bot lines still allowed before `--count` is satisfied.
    remaining: Option<usize>,
}

impl LogPrinter {
    fn new(args: &LogsArgs, global: &GlobalOpts) -> Self {
        Self {
            cursor: LogCursor::new(),
            color: output::should_color(&global.color),
            markers: !(args.no_markers || global.quiet),
            json: matches!(global.output, OutputFormat::Json | OutputFormat::JsonCompact),
            remaining: args.count,
        }
    }

    fn satisfied(&self) -> bool {
        self.remaining == Some(0)
    }

    fn flush(&mut self, store: &LiveLogStore<WebSocketTransport>) -> Result<(), CliError> {
        let mut stdout = io::stdout().lock();
        for line in store.read_new(&mut self.cursor) {
            let marker = output::is_marker(&line);
            if marker && !self.markers {
                continue;
            }
            if !marker {
                match self.remaining {
                    Some(0) => continue,
                    Some(ref mut n) => *n -= 1,
                    None => {}
                }
            }

            let rendered = if self.json {
                serde_json::to_string(&line)?
            } else {
                output::paint_log_line(&line, self.color)
            };
            writeln!(stdout, "{rendered}")?;
        }
        stdout.flush()?;
        Ok(())
    }
}

pub async fn handle(
    dashboard: &DashboardConfig,
    args: LogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let location = dashboard.page_location()?;
    let mut store = LiveLogStore::new(WebSocketTransport::new(), location);
    let mut printer = LogPrinter::new(&args, global);

    store.start_live();
    printer.flush(&store)?;

    let mut was_live = false;
    let mut last_error: Option<String> = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while store.has_connection() && !printer.satisfied() {
        tokio::select! {
            biased;

            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }

            event = store.pump() => {
                let Some(event) = event else { break };
                if let TransportEventKind::Errored(detail) = event.kind {
                    last_error = Some(detail);
                }
                was_live |= store.is_live();
                printer.flush(&store)?;
            }
        }
    }

    if store.link_state() != LinkState::Absent {
        store.stop_live();
        let closed = tokio::time::timeout(CLOSE_GRACE, async {
            while let Some(event) = store.pump().await {
                if event.kind == TransportEventKind::Closed {
                    break;
                }
            }
        })
        .await;
        if closed.is_err() {
            tracing::debug!("Close handshake did not finish in time");
        }
        printer.flush(&store)?;
        return Ok(());
    }

    if was_live {
        return Ok(());
    }

    // The stream ended before it ever opened.
    let url = store
        .location()
        .log_stream_url()
        .map_or_else(|_| store.location().to_string(), |u| u.to_string());
    Err(CliError::ConnectionFailed {
        url,
        source: last_error
            .unwrap_or_else(|| "connection closed before the stream opened".into())
            .into(),
    })
}
