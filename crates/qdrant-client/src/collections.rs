//! Collection lifecycle operations.

use std::time::Duration;

use tonic::transport::Channel;
use tracing::{debug, info};

use qdrant_rpc::pb::{
    self, collections_client::CollectionsClient as GrpcCollectionsClient, vectors_config,
};
use qdrant_types::Distance;

use crate::client::build_request;
use crate::convert::distance_to_proto;
use crate::error::ClientError;

/// Create, drop and inspect collections.
#[derive(Debug, Clone)]
pub struct CollectionsClient {
    inner: GrpcCollectionsClient<Channel>,
    request_timeout: Option<Duration>,
}

impl CollectionsClient {
    pub(crate) fn new(channel: Channel, request_timeout: Option<Duration>) -> Self {
        Self {
            inner: GrpcCollectionsClient::new(channel),
            request_timeout,
        }
    }

    /// Create a collection of dense vectors.
    ///
    /// # Arguments
    ///
    /// * `name` - Collection name, unique within the service
    /// * `vector_size` - Vector dimensionality
    /// * `distance` - A [`Distance`] or a metric name (`"DOT"`, `"COSINE"`;
    ///   anything else selects Euclidean)
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rpc` with the service's status when the call
    /// fails or the collection already exists.
    pub async fn create_collection(
        &self,
        name: &str,
        vector_size: u64,
        distance: impl Into<Distance>,
    ) -> Result<(), ClientError> {
        let distance = distance.into();
        info!(collection = name, vector_size, %distance, "Creating collection");

        let request = build_request(
            pb::CreateCollection {
                collection_name: name.to_string(),
                vectors_config: Some(pb::VectorsConfig {
                    config: Some(vectors_config::Config::Params(pb::VectorParams {
                        size: vector_size,
                        distance: distance_to_proto(distance) as i32,
                    })),
                }),
                ..Default::default()
            },
            self.request_timeout,
        );
        self.inner.clone().create(request).await?;
        Ok(())
    }

    /// Drop a collection. Whether dropping a missing collection is an error
    /// is up to the service.
    pub async fn delete_collection(&self, name: &str) -> Result<(), ClientError> {
        info!(collection = name, "Deleting collection");
        let request = build_request(
            pb::DeleteCollection {
                collection_name: name.to_string(),
                ..Default::default()
            },
            self.request_timeout,
        );
        self.inner.clone().delete(request).await?;
        Ok(())
    }

    /// Names of all collections.
    pub async fn list_collections(&self) -> Result<Vec<String>, ClientError> {
        debug!("ListCollections request");
        let request = build_request(pb::ListCollectionsRequest {}, self.request_timeout);
        let response = self.inner.clone().list(request).await?;
        Ok(response
            .into_inner()
            .collections
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    pub async fn collection_exists(&self, name: &str) -> Result<bool, ClientError> {
        debug!("CollectionExists request: {}", name);
        let request = build_request(
            pb::CollectionExistsRequest {
                collection_name: name.to_string(),
            },
            self.request_timeout,
        );
        let response = self.inner.clone().collection_exists(request).await?;
        Ok(response.into_inner().result.is_some_and(|r| r.exists))
    }
}
