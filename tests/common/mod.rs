//! Shared utilities for bridge integration testing: a scriptable
//! transaction feed and helpers for spawning the bridge server.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tonic::{Request, Response, Status};

use tx_bridge::backend::proto::tx_feed_server::{TxFeed, TxFeedServer};
use tx_bridge::backend::proto::{Transaction, TransactionFilter};
use tx_bridge::config::BridgeConfig;
use tx_bridge::http::HttpServer;
use tx_bridge::lifecycle::Shutdown;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How the mock feed answers one stream open.
#[derive(Clone, Copy)]
pub enum FeedScript {
    /// Emit records every `interval`, starting after `delay`; a `count`
    /// of `None` means the stream never ends on its own.
    Emit {
        count: Option<usize>,
        interval: Duration,
        delay: Duration,
    },
    /// Refuse the open outright.
    Reject,
}

impl FeedScript {
    /// A finite stream of `count` records at a brisk pace.
    pub fn finite(count: usize) -> Self {
        FeedScript::Emit {
            count: Some(count),
            interval: Duration::from_millis(10),
            delay: Duration::ZERO,
        }
    }

    /// A stream that keeps emitting until cancelled.
    pub fn endless(interval: Duration) -> Self {
        FeedScript::Emit {
            count: None,
            interval,
            delay: Duration::ZERO,
        }
    }
}

/// Counters exposed by the mock feed for assertions.
#[derive(Default)]
pub struct FeedStats {
    opens: AtomicU32,
    active: AtomicI64,
}

impl FeedStats {
    /// Stream opens seen so far, accepted or rejected.
    pub fn opens(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }

    /// Streams currently emitting.
    pub fn active(&self) -> i64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait until exactly `n` streams are active.
    ///
    /// Cancellation reaches the emit task on its next send, so this can
    /// lag by one interval.
    pub async fn wait_active(&self, n: i64, timeout: Duration) {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.active() != n {
            assert!(
                tokio::time::Instant::now() < deadline,
                "expected {} active stream(s), still at {}",
                n,
                self.active()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Decrements the active-stream count when an emit task ends.
struct ActiveGuard(Arc<FeedStats>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Build the record an emit task sends for (`value`, `seq`).
pub fn transaction(value: f32, seq: usize) -> Transaction {
    Transaction {
        hash: record_hash(value, seq),
        sender: "0xaaaa".to_string(),
        recipient: "0xbbbb".to_string(),
        value: value as f64,
        timestamp_ms: 1_700_000_000_000 + seq as u64,
    }
}

/// The hash an emit task tags onto record `seq` of a stream for `value`.
pub fn record_hash(value: f32, seq: usize) -> String {
    format!("{}-{}", value, seq)
}

struct MockFeed<F> {
    script: F,
    stats: Arc<FeedStats>,
}

#[tonic::async_trait]
impl<F> TxFeed for MockFeed<F>
where
    F: Fn(f32) -> FeedScript + Send + Sync + 'static,
{
    type StreamTransactionsStream = ReceiverStream<Result<Transaction, Status>>;

    async fn stream_transactions(
        &self,
        request: Request<TransactionFilter>,
    ) -> Result<Response<Self::StreamTransactionsStream>, Status> {
        let value = request.into_inner().min_value;
        self.stats.opens.fetch_add(1, Ordering::SeqCst);

        match (self.script)(value) {
            FeedScript::Reject => Err(Status::invalid_argument(format!(
                "value {} rejected",
                value
            ))),
            FeedScript::Emit {
                count,
                interval,
                delay,
            } => {
                let (tx, rx) = mpsc::channel(4);
                self.stats.active.fetch_add(1, Ordering::SeqCst);
                let guard = ActiveGuard(Arc::clone(&self.stats));

                tokio::spawn(async move {
                    let _guard = guard;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let mut seq = 0usize;
                    loop {
                        if let Some(limit) = count {
                            if seq >= limit {
                                break;
                            }
                        }
                        // A send error means the stream was cancelled.
                        if tx.send(Ok(transaction(value, seq))).await.is_err() {
                            break;
                        }
                        seq += 1;
                        tokio::time::sleep(interval).await;
                    }
                });

                Ok(Response::new(ReceiverStream::new(rx)))
            }
        }
    }
}

/// Start a mock feed whose behavior is chosen per requested value.
pub async fn start_mock_feed<F>(script: F) -> (SocketAddr, Arc<FeedStats>)
where
    F: Fn(f32) -> FeedScript + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let stats = Arc::new(FeedStats::default());
    let feed = MockFeed {
        script,
        stats: Arc::clone(&stats),
    };

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(TxFeedServer::new(feed))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    (addr, stats)
}

/// Spawn a bridge server on an ephemeral port.
pub async fn start_bridge(backend_address: String) -> (SocketAddr, Shutdown) {
    start_bridge_with(backend_address, |_| {}).await
}

/// Spawn a bridge server with config tweaks applied on top of defaults.
pub async fn start_bridge_with(
    backend_address: String,
    configure: impl FnOnce(&mut BridgeConfig),
) -> (SocketAddr, Shutdown) {
    let mut config = BridgeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.backend.address = backend_address;
    config.observability.metrics_enabled = false;
    configure(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, shutdown.clone()).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}

/// Open a WebSocket to the bridge.
pub async fn connect_ws(addr: SocketAddr) -> WsClient {
    try_connect_ws(addr).await.expect("WebSocket connect failed")
}

/// Open a WebSocket, surfacing handshake rejections to the caller.
pub async fn try_connect_ws(
    addr: SocketAddr,
) -> Result<WsClient, tokio_tungstenite::tungstenite::Error> {
    connect_async(format!("ws://{}/", addr)).await.map(|(ws, _)| ws)
}

/// Send one request value as a text frame.
pub async fn send_value(ws: &mut WsClient, value: &str) {
    ws.send(Message::Text(value.into()))
        .await
        .expect("WebSocket send failed");
}

/// Receive the next record within `timeout`; `None` on timeout or close.
pub async fn recv_record(ws: &mut WsClient, timeout: Duration) -> Option<Transaction> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let remaining = deadline.checked_duration_since(tokio::time::Instant::now())?;
        match tokio::time::timeout(remaining, ws.next()).await {
            Err(_) => return None,
            Ok(None) => return None,
            Ok(Some(Err(_))) => return None,
            Ok(Some(Ok(Message::Text(text)))) => {
                return Some(serde_json::from_str(text.as_str()).expect("record is not valid JSON"));
            }
            Ok(Some(Ok(_))) => continue,
        }
    }
}

/// Wait for the server to end the connection. Returns false on timeout.
pub async fn wait_closed(ws: &mut WsClient, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let Some(remaining) = deadline.checked_duration_since(tokio::time::Instant::now()) else {
            return false;
        };
        match tokio::time::timeout(remaining, ws.next()).await {
            Err(_) => return false,
            Ok(None) => return true,
            Ok(Some(Err(_))) => return true,
            Ok(Some(Ok(Message::Close(_)))) => return true,
            Ok(Some(Ok(_))) => continue,
        }
    }
}
