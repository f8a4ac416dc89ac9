//! Collection snapshots.

use std::time::Duration;

use tonic::transport::Channel;
use tracing::{debug, info};

use qdrant_rpc::pb::{self, snapshots_client::SnapshotsClient as GrpcSnapshotsClient};
use qdrant_types::SnapshotInfo;

use crate::client::build_request;
use crate::convert::snapshot_from_proto;
use crate::error::ClientError;

/// Create, list and delete collection snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotsClient {
    inner: GrpcSnapshotsClient<Channel>,
    request_timeout: Option<Duration>,
}

impl SnapshotsClient {
    pub(crate) fn new(channel: Channel, request_timeout: Option<Duration>) -> Self {
        Self {
            inner: GrpcSnapshotsClient::new(channel),
            request_timeout,
        }
    }

    /// Take a snapshot of a collection.
    ///
    /// # Returns
    ///
    /// The snapshot's name (needed to delete it) and size in bytes. An empty
    /// name means the service replied without a snapshot description.
    pub async fn take_snapshot(&self, collection: &str) -> Result<SnapshotInfo, ClientError> {
        let request = build_request(
            pb::CreateSnapshotRequest {
                collection_name: collection.to_string(),
            },
            self.request_timeout,
        );
        let response = self.inner.clone().create(request).await?.into_inner();
        let snapshot = match response.snapshot_description {
            Some(description) => snapshot_from_proto(description),
            None => {
                debug!(collection, "CreateSnapshot reply carried no description");
                SnapshotInfo::default()
            }
        };
        info!(
            collection,
            snapshot = %snapshot.name,
            size_bytes = snapshot.size_bytes,
            "Snapshot created"
        );
        Ok(snapshot)
    }

    pub async fn list_snapshots(&self, collection: &str) -> Result<Vec<SnapshotInfo>, ClientError> {
        debug!("ListSnapshots request: {}", collection);
        let request = build_request(
            pb::ListSnapshotsRequest {
                collection_name: collection.to_string(),
            },
            self.request_timeout,
        );
        let response = self.inner.clone().list(request).await?;
        Ok(response
            .into_inner()
            .snapshot_descriptions
            .into_iter()
            .map(snapshot_from_proto)
            .collect())
    }

    pub async fn delete_snapshot(
        &self,
        collection: &str,
        snapshot_name: &str,
    ) -> Result<(), ClientError> {
        info!(collection, snapshot = snapshot_name, "Deleting snapshot");
        let request = build_request(
            pb::DeleteSnapshotRequest {
                collection_name: collection.to_string(),
                snapshot_name: snapshot_name.to_string(),
            },
            self.request_timeout,
        );
        self.inner.clone().delete(request).await?;
        Ok(())
    }
}
