//! Generation control: the latest request value wins.
//!
//! # Responsibilities
//! - Read inbound frames from one client connection
//! - Parse request values and discard malformed frames
//! - Cancel the in-flight generation before opening the next
//! - Spawn one relay task per successfully opened stream
//!
//! # Design Decisions
//! - Cancellation is issued strictly before the new stream opens, so the
//!   feed never serves two streams for one connection on purpose
//! - The new id is promoted before the open await: a superseded relay
//!   loses the write gate even while the open is still in flight
//! - A failed open leaves the bridge idle but alive; the next value
//!   starts over

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::StreamExt;
use tokio::sync::broadcast;

use crate::backend::BackendClient;
use crate::bridge::generation::{Generation, GenerationId};
use crate::bridge::outbound::{OutboundWriter, SharedWriter};
use crate::bridge::parse::parse_request_value;
use crate::bridge::relay::relay_records;
use crate::net::connection::ConnectionId;
use crate::observability::metrics;

/// Tracks the current generation for one client connection.
///
/// Holds at most one cancellation handle at a time; it is invoked and
/// replaced the moment a newer request value is accepted.
pub struct GenerationController {
    connection_id: ConnectionId,
    backend: BackendClient,
    writer: SharedWriter,
    last_id: GenerationId,
    current: Option<Generation>,
}

impl GenerationController {
    /// Create an idle controller for one connection.
    pub fn new(connection_id: ConnectionId, backend: BackendClient, writer: SharedWriter) -> Self {
        Self {
            connection_id,
            backend,
            writer,
            last_id: GenerationId::NONE,
            current: None,
        }
    }

    /// Cancel the in-flight generation, if any, and start one for `value`.
    pub async fn supersede(&mut self, value: f32) {
        let id = self.last_id.successor();
        self.last_id = id;

        if let Some(previous) = self.current.take() {
            tracing::debug!(
                connection_id = %self.connection_id,
                superseded = %previous.id,
                value = %previous.value,
                "Cancelling superseded generation"
            );
            previous.cancel();
            metrics::generation_superseded();
        }

        self.writer.lock().await.promote(id);

        let stream = match self.backend.open_stream(value).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(
                    connection_id = %self.connection_id,
                    generation = %id,
                    value = %value,
                    error = %e,
                    "Backend stream open failed"
                );
                metrics::backend_open_failed();
                return;
            }
        };

        let generation = Generation::new(id, value);
        tracing::info!(
            connection_id = %self.connection_id,
            generation = %id,
            value = %value,
            "Backend stream opened"
        );
        metrics::generation_started();

        tokio::spawn(relay_records(
            self.connection_id,
            id,
            stream,
            Arc::clone(&self.writer),
            generation.cancellation(),
        ));
        self.current = Some(generation);
    }

    /// Cancel whatever generation is current. Used at teardown.
    pub fn shutdown(&mut self) {
        if let Some(current) = self.current.take() {
            tracing::debug!(
                connection_id = %self.connection_id,
                generation = %current.id,
                "Cancelling generation at teardown"
            );
            current.cancel();
        }
    }
}

impl Drop for GenerationController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Bridge one client connection to the transaction feed until the client
/// disconnects, the transport fails, or the process shuts down.
pub async fn run_bridge(
    socket: WebSocket,
    backend: BackendClient,
    connection_id: ConnectionId,
    mut shutdown: broadcast::Receiver<()>,
) {
    let (sink, mut inbound) = socket.split();
    let writer = OutboundWriter::new(sink);
    let mut controller =
        GenerationController::new(connection_id, backend, Arc::clone(&writer));

    loop {
        let frame = tokio::select! {
            frame = inbound.next() => frame,
            _ = shutdown.recv() => {
                tracing::info!(connection_id = %connection_id, "Shutting down, closing client connection");
                break;
            }
        };

        let message = match frame {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "Client read failed");
                break;
            }
            None => break,
        };

        let payload = match &message {
            Message::Text(text) => text.as_bytes(),
            Message::Binary(bytes) => bytes.as_ref(),
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => {
                tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                break;
            }
        };

        match parse_request_value(payload) {
            Ok(value) => controller.supersede(value).await,
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Discarding malformed request value"
                );
                metrics::malformed_value();
            }
        }
    }

    controller.shutdown();
    writer.lock().await.close().await;
}
