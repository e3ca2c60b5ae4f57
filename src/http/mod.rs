//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, routes, graceful shutdown)
//!     → websocket.rs (upgrade, connection limit, bridge handoff)
//!     → bridge subsystem owns the connection from there
//! ```

pub mod server;
pub mod websocket;

pub use server::HttpServer;
