//! Transaction Stream Bridge
//!
//! Bridges WebSocket clients to a server-streaming transaction feed. Each
//! text frame a client sends is a value threshold; the bridge cancels the
//! client's in-flight feed stream, opens a new one for the latest value,
//! and relays the records back as JSON. The newest value always wins.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 TX BRIDGE                     │
//!                          │                                               │
//!     value frame          │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!     ─────────────────────┼─▶│  http   │──▶│ bridge  │──▶│  backend   │──┼──▶ TxFeed
//!                          │  │ws upgrade│  │controller│  │   client   │  │    (gRPC)
//!                          │  └─────────┘   └────┬────┘   └────────────┘  │
//!                          │                     │ cancel / open           │
//!                          │                     ▼                         │
//!     JSON records         │  ┌─────────┐   ┌─────────┐                   │
//!     ◀────────────────────┼──│outbound │◀──│  relay  │◀──────────────────┼──── record stream
//!                          │  │  gate   │   │  tasks  │                   │
//!                          │  └─────────┘   └─────────┘                   │
//!                          │                                               │
//!                          │  ┌─────────────────────────────────────────┐ │
//!                          │  │          Cross-Cutting Concerns          │ │
//!                          │  │  config │ observability │ lifecycle     │ │
//!                          │  └─────────────────────────────────────────┘ │
//!                          └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use tx_bridge::config::{loader, BridgeConfig};
use tx_bridge::http::HttpServer;
use tx_bridge::lifecycle::{signals, Shutdown};
use tx_bridge::observability::{logging, metrics};

/// WebSocket-to-gRPC transaction stream bridge.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path.
    #[arg(short, long, default_value = "bridge.toml")]
    config: PathBuf,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (mut config, from_file) = if args.config.exists() {
        (loader::load_config(&args.config)?, true)
    } else {
        (BridgeConfig::default(), false)
    };

    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);

    tracing::info!("tx-bridge v0.1.0 starting");
    if !from_file {
        tracing::info!(path = %args.config.display(), "Config file not found, using defaults");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_address = %config.backend.address,
        max_connections = config.listener.max_connections,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(shutdown.clone()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, shutdown)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
