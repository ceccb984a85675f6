//! JSON-lines diagnostics server.
//!
//! Each input line is one request:
//!
//! ```text
//! {"method":"validate","buffer":"main.kodi","text":"let x = 1\nprint(y)"}
//! {"method":"clear","buffer":"main.kodi"}
//! ```
//!
//! Each output line publishes the diagnostics of one buffer:
//!
//! ```text
//! {"buffer":"main.kodi","diagnostics":[{"line":2,"column":7,"message":"Undefined variable 'y'","severity":"warning"}]}
//! ```
//!
//! Validations are debounced per buffer: a request waits for the configured
//! delay and is dropped if a newer request for the same buffer arrived in
//! the meantime. A clear cancels any pending validation and publishes an
//! empty list.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use kodi_diagnostics::{Diagnostic, DiagnosticsService, EngineLoader};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// A client request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Request {
    Validate { buffer: String, text: String },
    Clear { buffer: String },
}

/// A line written back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Publish {
        buffer: String,
        diagnostics: Vec<Diagnostic>,
    },
    Error {
        error: String,
    },
}

/// Latest request ticket per buffer.
#[derive(Clone)]
struct Debouncer {
    delay: Duration,
    tickets: Arc<Mutex<HashMap<String, u64>>>,
}

impl Debouncer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            tickets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Take a new ticket for `buffer`, superseding older ones.
    async fn supersede(&self, buffer: &str) -> u64 {
        let mut tickets = self.tickets.lock().await;
        let ticket = tickets.entry(buffer.to_string()).or_insert(0);
        *ticket += 1;
        *ticket
    }

    async fn is_latest(&self, buffer: &str, ticket: u64) -> bool {
        self.tickets.lock().await.get(buffer) == Some(&ticket)
    }
}

/// Serve requests from `input` until it closes, writing responses to
/// `output`. Pending validations finish before this returns; the writer is
/// handed back.
pub async fn serve<L, R, W>(
    service: Arc<DiagnosticsService<L>>,
    input: R,
    output: W,
) -> Result<W>
where
    L: EngineLoader + 'static,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_responses(rx, output));
    let debouncer = Debouncer::new(service.config().debounce());
    let mut tasks = JoinSet::new();
    let mut lines = BufReader::new(input).lines();

    while let Some(line) = lines.next_line().await.context("failed to read request")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Request>(line) {
            Ok(Request::Validate { buffer, text }) => {
                let ticket = debouncer.supersede(&buffer).await;
                let service = service.clone();
                let debouncer = debouncer.clone();
                let tx = tx.clone();
                tasks.spawn(async move {
                    tokio::time::sleep(debouncer.delay).await;
                    if !debouncer.is_latest(&buffer, ticket).await {
                        debug!(buffer, ticket, "validation superseded");
                        return;
                    }
                    if let Some(diagnostics) = service.validate(&buffer, &text).await {
                        send(&tx, Response::Publish { buffer, diagnostics });
                    }
                });
            }
            Ok(Request::Clear { buffer }) => {
                debouncer.supersede(&buffer).await;
                service.clear_diagnostics(&buffer).await;
                send(
                    &tx,
                    Response::Publish {
                        buffer,
                        diagnostics: Vec::new(),
                    },
                );
            }
            Err(err) => {
                warn!(error = %err, "invalid request");
                send(
                    &tx,
                    Response::Error {
                        error: format!("invalid request: {err}"),
                    },
                );
            }
        }

        while let Some(finished) = tasks.try_join_next() {
            if let Err(err) = finished {
                warn!(error = %err, "validation task failed");
            }
        }
    }

    while let Some(finished) = tasks.join_next().await {
        if let Err(err) = finished {
            warn!(error = %err, "validation task failed");
        }
    }
    drop(tx);

    let output = writer
        .await
        .context("response writer panicked")?
        .context("failed to write response")?;
    Ok(output)
}

fn send(tx: &mpsc::UnboundedSender<Response>, response: Response) {
    if tx.send(response).is_err() {
        warn!("response writer closed, dropping response");
    }
}

async fn write_responses<W: AsyncWrite + Unpin>(
    mut rx: mpsc::UnboundedReceiver<Response>,
    mut output: W,
) -> std::io::Result<W> {
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
    }
    Ok(output)
}
