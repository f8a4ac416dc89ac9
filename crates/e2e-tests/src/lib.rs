//! End-to-end test infrastructure for the vector-search client.
//!
//! Provides a [`TestHarness`] that runs the in-memory [`FakeQdrant`] on an
//! ephemeral port and hands out clients connected to it.

pub mod fake;

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{Map, Value as JsonValue};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing_subscriber::EnvFilter;

use qdrant_client::{ClientSettings, QdrantClient};
use qdrant_rpc::pb::{
    collections_server::CollectionsServer, points_server::PointsServer,
    qdrant_server::QdrantServer, snapshots_server::SnapshotsServer,
};

pub use fake::FakeQdrant;

/// Test harness that manages a fake service's lifecycle.
pub struct TestHarness {
    /// Shared state of the running fake, for assertions
    pub service: FakeQdrant,
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _server_handle: tokio::task::JoinHandle<Result<(), tonic::transport::Error>>,
}

impl TestHarness {
    /// Start a fake service on 127.0.0.1 with an OS-assigned port.
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(FakeQdrant::new()).await
    }

    pub async fn start_with(service: FakeQdrant) -> anyhow::Result<Self> {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = Server::builder()
            .add_service(CollectionsServer::new(service.clone()))
            .add_service(PointsServer::new(service.clone()))
            .add_service(QdrantServer::new(service.clone()))
            .add_service(SnapshotsServer::new(service.clone()));

        let server_handle = tokio::spawn(async move {
            server
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
                    shutdown_rx.await.ok();
                })
                .await
        });

        tracing::debug!(%addr, "Fake service listening");

        Ok(Self {
            service,
            addr,
            shutdown_tx: Some(shutdown_tx),
            _server_handle: server_handle,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Connect a client to this harness.
    pub async fn client(&self) -> QdrantClient {
        QdrantClient::connect(&self.endpoint())
            .await
            .expect("Failed to connect to fake service")
    }

    /// Connect a client whose requests carry the given deadline.
    pub async fn client_with_timeout(&self, timeout: Duration) -> QdrantClient {
        let settings = ClientSettings {
            request_timeout_ms: Some(timeout.as_millis() as u64),
            ..ClientSettings::new(self.endpoint())
        };
        QdrantClient::connect_with_settings(&settings)
            .await
            .expect("Failed to connect to fake service")
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Install a test-friendly subscriber once. Controlled by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Unwrap a JSON object literal into a payload map.
pub fn object(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A deterministic UUID-shaped id for test point `n`.
pub fn test_id(n: u32) -> String {
    format!("{:08x}-0000-4000-8000-{:012x}", n, n)
}
