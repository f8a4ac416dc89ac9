//! Typed async client for the vector-search service.
//!
//! This crate provides:
//! - `QdrantClient` for connecting to the service over gRPC
//! - Narrow sub-clients for collections, points, health and snapshots
//! - The point codec converting payloads to and from wire values
//!
//! # Example
//!
//! ```rust,no_run
//! use qdrant_client::{Point, QdrantClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QdrantClient::connect("http://localhost:6334").await?;
//!
//!     client.create_collection("docs", 4, "COSINE").await?;
//!
//!     let point = Point::new("11111111-1111-1111-1111-111111111111", vec![1.0, 0.0, 0.0, 0.0])
//!         .with_payload([("tag", json!("a"))]);
//!     client.upsert("docs", vec![point], true).await?;
//!
//!     for hit in client.search("docs", &[1.0, 0.0, 0.0, 0.0], 1).await? {
//!         println!("{} {:.3} {:?}", hit.id, hit.score, hit.payload);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod collections;
pub mod convert;
pub mod error;
pub mod points;
pub mod service;
pub mod snapshots;

pub use client::{QdrantClient, DEFAULT_ENDPOINT};
pub use collections::CollectionsClient;
pub use error::ClientError;
pub use points::PointsClient;
pub use service::ServiceClient;
pub use snapshots::SnapshotsClient;

// Re-export the data types for convenience
pub use qdrant_types::{
    ClientSettings, Distance, HealthInfo, Payload, Point, ScoredColumns, ScoredPoint,
    SnapshotInfo, Value,
};
