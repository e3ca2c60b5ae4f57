//! Backend transaction feed subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted request value
//!     → client.rs (open server stream for the value)
//!     → proto.rs (generated message and service types)
//!     → Streaming<Transaction> handed to the relay
//! ```
//!
//! # Design Decisions
//! - One stream open per accepted value; streams are never reused
//! - The channel is shared and multiplexed, opens do not re-dial

pub mod client;
pub mod proto;

pub use client::{BackendClient, BackendError};
pub use proto::{Transaction, TransactionFilter};
