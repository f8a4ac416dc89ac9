//! Connection to the vector-search service.
//!
//! A [`QdrantClient`] owns one gRPC channel. The narrow sub-clients returned
//! by [`QdrantClient::collections`], [`QdrantClient::points`],
//! [`QdrantClient::service`] and [`QdrantClient::snapshots`] all share it.
//! Every operation is a single request/response; nothing is retried.

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info};

use qdrant_types::{ClientSettings, Distance, HealthInfo, Point, ScoredPoint, SnapshotInfo};

use crate::collections::CollectionsClient;
use crate::error::ClientError;
use crate::points::PointsClient;
use crate::service::ServiceClient;
use crate::snapshots::SnapshotsClient;

/// Default gRPC endpoint of the service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:6334";

/// Client for the vector-search service.
///
/// Cloning is cheap and clones share the underlying connection, so one client
/// can serve many concurrent tasks.
#[derive(Debug, Clone)]
pub struct QdrantClient {
    channel: Channel,
    request_timeout: Option<Duration>,
}

impl QdrantClient {
    /// Connect to the service.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The gRPC endpoint (e.g., `http://localhost:6334`)
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidEndpoint` if the URL cannot be parsed and
    /// `ClientError::Connection` if the connection fails.
    pub async fn connect(endpoint: &str) -> Result<Self, ClientError> {
        Self::connect_with_settings(&ClientSettings::new(endpoint)).await
    }

    /// Connect to the default endpoint.
    pub async fn connect_default() -> Result<Self, ClientError> {
        Self::connect(DEFAULT_ENDPOINT).await
    }

    /// Connect using loaded settings.
    ///
    /// When `connect_lazily` is set no I/O happens here; connection failures
    /// surface as `ClientError::Rpc` on the first call instead.
    pub async fn connect_with_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        settings.validate()?;
        let endpoint = build_endpoint(settings)?;

        let channel = if settings.connect_lazily {
            debug!("Creating lazy channel to {}", settings.endpoint);
            endpoint.connect_lazy()
        } else {
            info!("Connecting to vector-search service at {}", settings.endpoint);
            endpoint.connect().await.map_err(ClientError::Connection)?
        };

        Ok(Self::from_channel(channel, settings.request_timeout()))
    }

    /// Create a client without connecting.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect_lazy(endpoint: &str) -> Result<Self, ClientError> {
        let settings = ClientSettings {
            connect_lazily: true,
            ..ClientSettings::new(endpoint)
        };
        settings.validate()?;
        let channel = build_endpoint(&settings)?.connect_lazy();
        Ok(Self::from_channel(channel, None))
    }

    /// Wrap an existing channel.
    pub fn from_channel(channel: Channel, request_timeout: Option<Duration>) -> Self {
        Self {
            channel,
            request_timeout,
        }
    }

    /// Deadline attached to every request, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn collections(&self) -> CollectionsClient {
        CollectionsClient::new(self.channel.clone(), self.request_timeout)
    }

    pub fn points(&self) -> PointsClient {
        PointsClient::new(self.channel.clone(), self.request_timeout)
    }

    pub fn service(&self) -> ServiceClient {
        ServiceClient::new(self.channel.clone(), self.request_timeout)
    }

    pub fn snapshots(&self) -> SnapshotsClient {
        SnapshotsClient::new(self.channel.clone(), self.request_timeout)
    }

    // ===== Collection Methods =====

    /// Create a collection. See [`CollectionsClient::create_collection`].
    pub async fn create_collection(
        &self,
        name: &str,
        vector_size: u64,
        distance: impl Into<Distance>,
    ) -> Result<(), ClientError> {
        self.collections()
            .create_collection(name, vector_size, distance)
            .await
    }

    pub async fn delete_collection(&self, name: &str) -> Result<(), ClientError> {
        self.collections().delete_collection(name).await
    }

    pub async fn list_collections(&self) -> Result<Vec<String>, ClientError> {
        self.collections().list_collections().await
    }

    pub async fn collection_exists(&self, name: &str) -> Result<bool, ClientError> {
        self.collections().collection_exists(name).await
    }

    // ===== Point Methods =====

    /// Upsert points. See [`PointsClient::upsert`].
    pub async fn upsert(
        &self,
        collection: &str,
        points: Vec<Point>,
        wait: bool,
    ) -> Result<(), ClientError> {
        self.points().upsert(collection, points, wait).await
    }

    /// Upsert parallel columns. See [`PointsClient::upsert_columns`].
    pub async fn upsert_columns(
        &self,
        collection: &str,
        vectors: Vec<Vec<f32>>,
        payloads: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
        ids: Vec<String>,
        wait: bool,
    ) -> Result<(), ClientError> {
        self.points()
            .upsert_columns(collection, vectors, payloads, ids, wait)
            .await
    }

    pub async fn delete_points<S: AsRef<str>>(
        &self,
        collection: &str,
        ids: &[S],
        wait: bool,
    ) -> Result<(), ClientError> {
        self.points().delete_points(collection, ids, wait).await
    }

    /// Nearest-neighbour search. See [`PointsClient::search`].
    pub async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: u64,
    ) -> Result<Vec<ScoredPoint>, ClientError> {
        self.points().search(collection, vector, limit).await
    }

    // ===== Service Methods =====

    pub async fn health(&self) -> Result<HealthInfo, ClientError> {
        self.service().health().await
    }

    pub async fn take_snapshot(&self, collection: &str) -> Result<SnapshotInfo, ClientError> {
        self.snapshots().take_snapshot(collection).await
    }

    pub async fn list_snapshots(&self, collection: &str) -> Result<Vec<SnapshotInfo>, ClientError> {
        self.snapshots().list_snapshots(collection).await
    }

    pub async fn delete_snapshot(
        &self,
        collection: &str,
        snapshot_name: &str,
    ) -> Result<(), ClientError> {
        self.snapshots()
            .delete_snapshot(collection, snapshot_name)
            .await
    }
}

fn build_endpoint(settings: &ClientSettings) -> Result<Endpoint, ClientError> {
    let endpoint = Endpoint::from_shared(settings.endpoint.clone())
        .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", settings.endpoint, e)))?
        .connect_timeout(settings.connect_timeout());

    Ok(match settings.request_timeout() {
        Some(timeout) => endpoint.timeout(timeout),
        None => endpoint,
    })
}

/// Wrap a message in a request carrying the client's deadline.
pub(crate) fn build_request<T>(message: T, timeout: Option<Duration>) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    if let Some(timeout) = timeout {
        request.set_timeout(timeout);
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_sets_deadline() {
        let request = build_request((), Some(Duration::from_millis(1500)));
        assert!(request.metadata().get("grpc-timeout").is_some());

        let request = build_request((), None);
        assert!(request.metadata().get("grpc-timeout").is_none());
    }

    #[test]
    fn test_invalid_endpoint() {
        let settings = ClientSettings::new("not a uri");
        let err = build_endpoint(&settings).unwrap_err();
        assert!(matches!(err, ClientError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let err = QdrantClient::connect_lazy("").unwrap_err();
        assert!(matches!(err, ClientError::Data(_)));
    }

    #[tokio::test]
    async fn test_connect_lazy_does_no_io() {
        let client = QdrantClient::connect_lazy("http://127.0.0.1:1").unwrap();
        assert!(client.request_timeout().is_none());
    }

    #[tokio::test]
    async fn test_connect_unreachable_fails() {
        let settings = ClientSettings {
            connect_timeout_ms: 200,
            ..ClientSettings::new("http://127.0.0.1:1")
        };
        let err = QdrantClient::connect_with_settings(&settings)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }

    #[tokio::test]
    async fn test_health_unreachable_is_rpc_error() {
        let client = QdrantClient::connect_lazy("http://127.0.0.1:1").unwrap();
        let err = client.health().await.unwrap_err();
        assert!(err.status().is_some(), "expected transport status, got {err}");
    }
}
