//! Service health.

use std::time::Duration;

use tonic::transport::Channel;
use tracing::debug;

use qdrant_rpc::pb::{self, qdrant_client::QdrantClient as GrpcServiceClient};
use qdrant_types::HealthInfo;

use crate::client::build_request;
use crate::error::ClientError;

#[derive(Debug, Clone)]
pub struct ServiceClient {
    inner: GrpcServiceClient<Channel>,
    request_timeout: Option<Duration>,
}

impl ServiceClient {
    pub(crate) fn new(channel: Channel, request_timeout: Option<Duration>) -> Self {
        Self {
            inner: GrpcServiceClient::new(channel),
            request_timeout,
        }
    }

    /// Check that the service is up and report its title and version.
    ///
    /// On failure there is no title or version at all; the error carries
    /// the transport status.
    pub async fn health(&self) -> Result<HealthInfo, ClientError> {
        debug!("HealthCheck request");
        let request = build_request(pb::HealthCheckRequest {}, self.request_timeout);
        let reply = self.inner.clone().health_check(request).await?.into_inner();
        Ok(HealthInfo {
            title: reply.title,
            version: reply.version,
            commit: reply.commit,
        })
    }
}
