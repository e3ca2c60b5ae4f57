//! WebSocket-to-gRPC Transaction Stream Bridge Library

pub mod backend;
pub mod bridge;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::BridgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
