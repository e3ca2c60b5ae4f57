//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Close client connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup in main: config first, then observability, then server
//! - Every bridge instance subscribes to the same shutdown channel

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
