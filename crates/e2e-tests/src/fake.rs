//! In-memory stand-in for the vector-search service.
//!
//! Implements the four gRPC services the client talks to with just enough
//! behaviour to exercise it: exact nearest-neighbour search, status codes
//! for missing or duplicate collections, and snapshot bookkeeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use tonic::{Request, Response, Status};
use tracing::debug;

use qdrant_client::convert::point_id_to_string;
use qdrant_rpc::pb::{
    self, collections_server::Collections, points_selector::PointsSelectorOneOf,
    point_id::PointIdOptions, qdrant_server::Qdrant, snapshots_server::Snapshots,
    vectors::VectorsOptions, vectors_config, with_payload_selector, with_vectors_selector,
};

pub const SERVICE_TITLE: &str = "qdrant - vector search engine";
pub const SERVICE_VERSION: &str = "1.12.4";

#[derive(Debug, Clone)]
struct StoredPoint {
    vector: Vec<f32>,
    payload: HashMap<String, pb::Value>,
}

#[derive(Debug)]
struct Collection {
    size: u64,
    distance: pb::Distance,
    points: HashMap<String, StoredPoint>,
    snapshots: Vec<pb::SnapshotDescription>,
}

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, Collection>,
    snapshot_seq: u64,
}

/// Fake service shared by all four gRPC servers.
#[derive(Debug, Clone, Default)]
pub struct FakeQdrant {
    state: Arc<Mutex<State>>,
    latency: Option<Duration>,
    bare_snapshot_replies: bool,
}

impl FakeQdrant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reply to snapshot creation without a snapshot description.
    pub fn with_bare_snapshot_replies(mut self) -> Self {
        self.bare_snapshot_replies = true;
        self
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, Status> {
        self.state
            .lock()
            .map_err(|_| Status::internal("state lock poisoned"))
    }

    /// Number of points stored in a collection, if it exists.
    pub fn point_count(&self, collection: &str) -> Option<usize> {
        let state = self.state.lock().ok()?;
        state.collections.get(collection).map(|c| c.points.len())
    }
}

fn missing(collection: &str) -> Status {
    Status::not_found(format!("Collection `{collection}` doesn't exist!"))
}

fn check_dim(collection: &Collection, actual: usize) -> Result<(), Status> {
    if actual as u64 != collection.size {
        return Err(Status::invalid_argument(format!(
            "Wrong input: Vector dimension error: expected dim: {}, got {}",
            collection.size, actual
        )));
    }
    Ok(())
}

fn score(distance: pb::Distance, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match distance {
        pb::Distance::Cosine => {
            let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if na == 0.0 || nb == 0.0 {
                0.0
            } else {
                dot / (na * nb)
            }
        }
        pb::Distance::Euclid => a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
        pb::Distance::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
        pb::Distance::Dot | pb::Distance::UnknownDistance => dot,
    }
}

fn higher_is_better(distance: pb::Distance) -> bool {
    !matches!(distance, pb::Distance::Euclid | pb::Distance::Manhattan)
}

#[tonic::async_trait]
impl Collections for FakeQdrant {
    async fn create(
        &self,
        request: Request<pb::CreateCollection>,
    ) -> Result<Response<pb::CollectionOperationResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let params = match req.vectors_config.and_then(|c| c.config) {
            Some(vectors_config::Config::Params(params)) => params,
            None => return Err(Status::invalid_argument("vectors_config is required")),
        };

        let mut state = self.state()?;
        if state.collections.contains_key(&req.collection_name) {
            return Err(Status::invalid_argument(format!(
                "Wrong input: Collection `{}` already exists!",
                req.collection_name
            )));
        }
        let distance = pb::Distance::try_from(params.distance)
            .map_err(|_| Status::invalid_argument("unknown distance"))?;
        debug!(collection = %req.collection_name, size = params.size, ?distance, "create");
        state.collections.insert(
            req.collection_name,
            Collection {
                size: params.size,
                distance,
                points: HashMap::new(),
                snapshots: Vec::new(),
            },
        );
        Ok(Response::new(pb::CollectionOperationResponse {
            result: true,
            time: 0.0,
        }))
    }

    async fn delete(
        &self,
        request: Request<pb::DeleteCollection>,
    ) -> Result<Response<pb::CollectionOperationResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let removed = self.state()?.collections.remove(&req.collection_name);
        Ok(Response::new(pb::CollectionOperationResponse {
            result: removed.is_some(),
            time: 0.0,
        }))
    }

    async fn list(
        &self,
        _request: Request<pb::ListCollectionsRequest>,
    ) -> Result<Response<pb::ListCollectionsResponse>, Status> {
        self.delay().await;
        let mut names: Vec<String> = self.state()?.collections.keys().cloned().collect();
        names.sort();
        Ok(Response::new(pb::ListCollectionsResponse {
            collections: names
                .into_iter()
                .map(|name| pb::CollectionDescription { name })
                .collect(),
            time: 0.0,
        }))
    }

    async fn collection_exists(
        &self,
        request: Request<pb::CollectionExistsRequest>,
    ) -> Result<Response<pb::CollectionExistsResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let exists = self.state()?.collections.contains_key(&req.collection_name);
        Ok(Response::new(pb::CollectionExistsResponse {
            result: Some(pb::CollectionExists { exists }),
            time: 0.0,
        }))
    }
}

fn completed() -> Response<pb::PointsOperationResponse> {
    Response::new(pb::PointsOperationResponse {
        result: Some(pb::UpdateResult {
            operation_id: Some(0),
            status: pb::UpdateStatus::Completed as i32,
        }),
        time: 0.0,
    })
}

#[tonic::async_trait]
impl pb::points_server::Points for FakeQdrant {
    async fn upsert(
        &self,
        request: Request<pb::UpsertPoints>,
    ) -> Result<Response<pb::PointsOperationResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let mut state = self.state()?;
        let collection = state
            .collections
            .get_mut(&req.collection_name)
            .ok_or_else(|| missing(&req.collection_name))?;

        let mut staged = Vec::with_capacity(req.points.len());
        for point in req.points {
            let vector = match point.vectors.and_then(|v| v.vectors_options) {
                Some(VectorsOptions::Vector(v)) => v.data,
                None => return Err(Status::invalid_argument("point has no vector")),
            };
            check_dim(collection, vector.len())?;
            staged.push((
                point_id_to_string(point.id),
                StoredPoint {
                    vector,
                    payload: point.payload,
                },
            ));
        }
        debug!(collection = %req.collection_name, count = staged.len(), "upsert");
        collection.points.extend(staged);
        Ok(completed())
    }

    async fn delete(
        &self,
        request: Request<pb::DeletePoints>,
    ) -> Result<Response<pb::PointsOperationResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let mut state = self.state()?;
        let collection = state
            .collections
            .get_mut(&req.collection_name)
            .ok_or_else(|| missing(&req.collection_name))?;

        if let Some(PointsSelectorOneOf::Points(list)) =
            req.points.and_then(|s| s.points_selector_one_of)
        {
            for id in list.ids {
                collection.points.remove(&point_id_to_string(Some(id)));
            }
        }
        Ok(completed())
    }

    async fn search(
        &self,
        request: Request<pb::SearchPoints>,
    ) -> Result<Response<pb::SearchResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let state = self.state()?;
        let collection = state
            .collections
            .get(&req.collection_name)
            .ok_or_else(|| missing(&req.collection_name))?;
        check_dim(collection, req.vector.len())?;

        let with_payload = matches!(
            req.with_payload.and_then(|s| s.selector_options),
            Some(with_payload_selector::SelectorOptions::Enable(true))
        );
        let with_vectors = matches!(
            req.with_vectors.and_then(|s| s.selector_options),
            Some(with_vectors_selector::SelectorOptions::Enable(true))
        );

        let mut hits: Vec<(f32, &String, &StoredPoint)> = collection
            .points
            .iter()
            .map(|(id, point)| (score(collection.distance, &req.vector, &point.vector), id, point))
            .collect();
        if higher_is_better(collection.distance) {
            hits.sort_by(|a, b| b.0.total_cmp(&a.0));
        } else {
            hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        }

        let result = hits
            .into_iter()
            .take(req.limit as usize)
            .map(|(score, id, point)| pb::ScoredPoint {
                id: Some(pb::PointId {
                    point_id_options: Some(PointIdOptions::Uuid(id.clone())),
                }),
                payload: if with_payload {
                    point.payload.clone()
                } else {
                    HashMap::new()
                },
                score,
                version: 0,
                vectors: with_vectors.then(|| pb::Vectors {
                    vectors_options: Some(VectorsOptions::Vector(pb::Vector {
                        data: point.vector.clone(),
                    })),
                }),
            })
            .collect();

        Ok(Response::new(pb::SearchResponse { result, time: 0.0 }))
    }
}

#[tonic::async_trait]
impl Qdrant for FakeQdrant {
    async fn health_check(
        &self,
        _request: Request<pb::HealthCheckRequest>,
    ) -> Result<Response<pb::HealthCheckReply>, Status> {
        self.delay().await;
        Ok(Response::new(pb::HealthCheckReply {
            title: SERVICE_TITLE.to_string(),
            version: SERVICE_VERSION.to_string(),
            commit: None,
        }))
    }
}

#[tonic::async_trait]
impl Snapshots for FakeQdrant {
    async fn create(
        &self,
        request: Request<pb::CreateSnapshotRequest>,
    ) -> Result<Response<pb::CreateSnapshotResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let mut guard = self.state()?;
        let state = &mut *guard;
        let collection = state
            .collections
            .get_mut(&req.collection_name)
            .ok_or_else(|| missing(&req.collection_name))?;

        state.snapshot_seq += 1;
        let snapshot = pb::SnapshotDescription {
            name: format!("{}-{}.snapshot", req.collection_name, state.snapshot_seq),
            creation_time: Some(prost_types::Timestamp::from(SystemTime::now())),
            size: 1024 + 64 * collection.points.len() as i64,
            checksum: Some(format!("{:016x}", state.snapshot_seq)),
        };
        collection.snapshots.push(snapshot.clone());
        Ok(Response::new(pb::CreateSnapshotResponse {
            snapshot_description: (!self.bare_snapshot_replies).then_some(snapshot),
            time: 0.0,
        }))
    }

    async fn list(
        &self,
        request: Request<pb::ListSnapshotsRequest>,
    ) -> Result<Response<pb::ListSnapshotsResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let state = self.state()?;
        let collection = state
            .collections
            .get(&req.collection_name)
            .ok_or_else(|| missing(&req.collection_name))?;
        Ok(Response::new(pb::ListSnapshotsResponse {
            snapshot_descriptions: collection.snapshots.clone(),
            time: 0.0,
        }))
    }

    async fn delete(
        &self,
        request: Request<pb::DeleteSnapshotRequest>,
    ) -> Result<Response<pb::DeleteSnapshotResponse>, Status> {
        self.delay().await;
        let req = request.into_inner();
        let mut state = self.state()?;
        let collection = state
            .collections
            .get_mut(&req.collection_name)
            .ok_or_else(|| missing(&req.collection_name))?;

        let before = collection.snapshots.len();
        collection.snapshots.retain(|s| s.name != req.snapshot_name);
        if collection.snapshots.len() == before {
            return Err(Status::not_found(format!(
                "Snapshot `{}` not found",
                req.snapshot_name
            )));
        }
        Ok(Response::new(pb::DeleteSnapshotResponse { time: 0.0 }))
    }
}
