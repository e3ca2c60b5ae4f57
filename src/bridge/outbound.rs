//! Outbound write path shared by relay tasks.
//!
//! # Responsibilities
//! - Serialize all writes to one client through a single lock
//! - Gate every write on the current generation id
//!
//! # Design Decisions
//! - The current id lives inside the lock, so promotion and the stale
//!   check can never be observed out of order
//! - A superseded relay learns its fate from the write outcome and exits
//!   instead of draining its stream

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use tokio::sync::Mutex;

use crate::bridge::generation::GenerationId;

/// Shared handle to the outbound half of one client connection.
pub type SharedWriter = Arc<Mutex<OutboundWriter>>;

/// Outcome of a gated write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The record went to the client.
    Delivered,
    /// The writing generation is no longer current; nothing was written.
    Superseded,
}

/// Outbound half of a client connection plus the newest promoted
/// generation id.
pub struct OutboundWriter {
    sink: SplitSink<WebSocket, Message>,
    current: GenerationId,
}

impl OutboundWriter {
    /// Wrap the write half of a freshly split socket.
    pub fn new(sink: SplitSink<WebSocket, Message>) -> SharedWriter {
        Arc::new(Mutex::new(Self {
            sink,
            current: GenerationId::NONE,
        }))
    }

    /// Make `generation` the only one allowed to write.
    ///
    /// Called under the lock before the generation's backend stream is
    /// opened, so older relays are fenced out even while the open is
    /// still in flight.
    pub fn promote(&mut self, generation: GenerationId) {
        self.current = generation;
    }

    /// Write one serialized record if `generation` is still current.
    pub async fn send_record(
        &mut self,
        generation: GenerationId,
        payload: String,
    ) -> Result<WriteOutcome, axum::Error> {
        if generation != self.current {
            return Ok(WriteOutcome::Superseded);
        }
        self.sink.send(Message::Text(payload.into())).await?;
        Ok(WriteOutcome::Delivered)
    }

    /// Send a close frame. Failures are ignored, the connection may
    /// already be gone.
    pub async fn close(&mut self) {
        let _ = self.sink.send(Message::Close(None)).await;
    }
}
