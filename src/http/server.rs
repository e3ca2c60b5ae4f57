//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the bridge and hello handlers
//! - Wire up middleware (tracing)
//! - Serve plain TCP or TLS depending on configuration
//! - Honor graceful shutdown from the lifecycle subsystem

use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::backend::{BackendClient, BackendError};
use crate::config::BridgeConfig;
use crate::http::websocket;
use crate::lifecycle::Shutdown;
use crate::net::connection::ConnectionTracker;
use crate::net::tls;

/// How long a TLS listener waits for in-flight connections at shutdown.
const TLS_DRAIN_GRACE: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub tracker: ConnectionTracker,
    pub max_connections: usize,
    pub shutdown: Shutdown,
}

/// HTTP server hosting the bridge endpoint.
pub struct HttpServer {
    router: Router,
    config: BridgeConfig,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the backend endpoint does not parse; it does not need to
    /// be reachable yet.
    pub fn new(config: BridgeConfig, shutdown: Shutdown) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;

        let state = AppState {
            backend,
            tracker: ConnectionTracker::new(),
            max_connections: config.listener.max_connections,
            shutdown: shutdown.clone(),
        };

        let router = Self::build_router(state);
        Ok(Self {
            router,
            config,
            shutdown,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(websocket::ws_handler))
            .route("/hello", get(hello))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let tls_config = self.config.listener.tls.clone();

        match tls_config {
            Some(tls_config) => {
                let rustls_config = tls::load_tls_config(&tls_config).await?;
                tracing::info!(address = %addr, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let watcher = handle.clone();
                let mut rx = self.shutdown.subscribe();
                tokio::spawn(async move {
                    let _ = rx.recv().await;
                    watcher.graceful_shutdown(Some(TLS_DRAIN_GRACE));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls_config)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
            None => {
                tracing::info!(address = %addr, "HTTP server starting");

                let mut rx = self.shutdown.subscribe();
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = rx.recv().await;
                    })
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Static test route, doubles as a liveness probe.
async fn hello() -> &'static str {
    "This is an example server.\n"
}
