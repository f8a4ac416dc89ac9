//! Point operations: upsert, delete, search.

use std::time::Duration;

use serde_json::Map;
use tonic::transport::Channel;
use tracing::debug;

use qdrant_rpc::pb::{
    self, points_client::PointsClient as GrpcPointsClient, points_selector,
    with_payload_selector, with_vectors_selector,
};
use qdrant_types::{points_from_columns, Point, ScoredPoint};

use crate::client::build_request;
use crate::convert::{build_point, point_id, read_point};
use crate::error::ClientError;

/// Write and query points in a collection.
#[derive(Debug, Clone)]
pub struct PointsClient {
    inner: GrpcPointsClient<Channel>,
    request_timeout: Option<Duration>,
}

impl PointsClient {
    pub(crate) fn new(channel: Channel, request_timeout: Option<Duration>) -> Self {
        Self {
            inner: GrpcPointsClient::new(channel),
            request_timeout,
        }
    }

    /// Insert or replace points in one batched request.
    ///
    /// With `wait` set the call returns once the write is applied; otherwise
    /// as soon as the service has accepted it.
    pub async fn upsert(
        &self,
        collection: &str,
        points: Vec<Point>,
        wait: bool,
    ) -> Result<(), ClientError> {
        debug!(collection, count = points.len(), wait, "Upsert request");
        let request = build_request(
            pb::UpsertPoints {
                collection_name: collection.to_string(),
                wait: Some(wait),
                points: points.into_iter().map(build_point).collect(),
            },
            self.request_timeout,
        );
        self.inner.clone().upsert(request).await?;
        Ok(())
    }

    /// Upsert points given as parallel columns.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Data` without sending anything when `ids` or
    /// `payloads` differ in length from `vectors`.
    pub async fn upsert_columns(
        &self,
        collection: &str,
        vectors: Vec<Vec<f32>>,
        payloads: Option<Vec<Map<String, serde_json::Value>>>,
        ids: Vec<String>,
        wait: bool,
    ) -> Result<(), ClientError> {
        let points = points_from_columns(ids, vectors, payloads)?;
        self.upsert(collection, points, wait).await
    }

    /// Delete points by id.
    pub async fn delete_points<S: AsRef<str>>(
        &self,
        collection: &str,
        ids: &[S],
        wait: bool,
    ) -> Result<(), ClientError> {
        debug!(collection, count = ids.len(), wait, "Delete points request");
        let selector = pb::PointsSelector {
            points_selector_one_of: Some(points_selector::PointsSelectorOneOf::Points(
                pb::PointsIdsList {
                    ids: ids.iter().map(|id| point_id(id.as_ref())).collect(),
                },
            )),
        };
        let request = build_request(
            pb::DeletePoints {
                collection_name: collection.to_string(),
                wait: Some(wait),
                points: Some(selector),
            },
            self.request_timeout,
        );
        self.inner.clone().delete(request).await?;
        Ok(())
    }

    /// Find the points nearest to `vector`.
    ///
    /// Results keep the service's ranking order. `limit` is an upper bound;
    /// fewer hits are returned when the collection is smaller.
    pub async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: u64,
    ) -> Result<Vec<ScoredPoint>, ClientError> {
        debug!(collection, limit, dim = vector.len(), "Search request");
        let request = build_request(
            pb::SearchPoints {
                collection_name: collection.to_string(),
                vector: vector.to_vec(),
                limit,
                with_payload: Some(pb::WithPayloadSelector {
                    selector_options: Some(with_payload_selector::SelectorOptions::Enable(true)),
                }),
                with_vectors: Some(pb::WithVectorsSelector {
                    selector_options: Some(with_vectors_selector::SelectorOptions::Enable(true)),
                }),
                ..Default::default()
            },
            self.request_timeout,
        );
        let response = self.inner.clone().search(request).await?;
        let hits: Vec<ScoredPoint> = response
            .into_inner()
            .result
            .into_iter()
            .map(read_point)
            .collect();
        debug!(collection, hits = hits.len(), "Search complete");
        Ok(hits)
    }
}
