//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (optional TLS handshake)
//!     → connection.rs (identity, active-count tracking)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Connection limit enforced at upgrade time, not accept time
//! - Each connection tracked so the limit survives abrupt disconnects
//! - TLS is optional and handled transparently

pub mod connection;
pub mod tls;
