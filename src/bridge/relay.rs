//! Result relay task.
//!
//! # Responsibilities
//! - Pull records off one backend stream
//! - Serialize each record as JSON and hand it to the gated writer
//! - Exit on cancellation, stream end, stream error, or write failure
//!
//! # Design Decisions
//! - Relay exits are quiet: the controller never joins or observes them
//! - A failed client write stops the relay but tears nothing else down;
//!   the inbound loop notices the broken connection on its own

use tokio_util::sync::CancellationToken;
use tonic::Streaming;

use crate::backend::proto::Transaction;
use crate::bridge::generation::GenerationId;
use crate::bridge::outbound::{SharedWriter, WriteOutcome};
use crate::net::connection::ConnectionId;
use crate::observability::metrics;

/// Forward records from one backend stream to the client until the stream
/// ends, fails, is cancelled, or loses the write gate.
pub async fn relay_records(
    connection_id: ConnectionId,
    generation: GenerationId,
    mut stream: Streaming<Transaction>,
    writer: SharedWriter,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(
                    connection_id = %connection_id,
                    generation = %generation,
                    "Relay cancelled"
                );
                metrics::generation_ended("cancelled");
                return;
            }
            next = stream.message() => next,
        };

        match next {
            Ok(Some(record)) => {
                let payload = match serde_json::to_string(&record) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(
                            connection_id = %connection_id,
                            generation = %generation,
                            error = %e,
                            "Dropping unserializable record"
                        );
                        continue;
                    }
                };

                let outcome = {
                    let mut writer = writer.lock().await;
                    writer.send_record(generation, payload).await
                };

                match outcome {
                    Ok(WriteOutcome::Delivered) => metrics::record_relayed(),
                    Ok(WriteOutcome::Superseded) => {
                        tracing::debug!(
                            connection_id = %connection_id,
                            generation = %generation,
                            "Superseded mid-record, dropping and exiting"
                        );
                        metrics::stale_record_dropped();
                        metrics::generation_ended("superseded");
                        return;
                    }
                    Err(e) => {
                        tracing::debug!(
                            connection_id = %connection_id,
                            generation = %generation,
                            error = %e,
                            "Client write failed, stopping relay"
                        );
                        metrics::generation_ended("write_failed");
                        return;
                    }
                }
            }
            Ok(None) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    generation = %generation,
                    "Backend stream ended"
                );
                metrics::generation_ended("end_of_stream");
                return;
            }
            Err(status) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    generation = %generation,
                    status = %status,
                    "Backend stream failed"
                );
                metrics::generation_ended("error");
                return;
            }
        }
    }
}
