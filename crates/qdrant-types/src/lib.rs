//! # qdrant-types
//!
//! Shared data types for the vector-search client.
//!
//! This crate defines:
//! - [`Value`]: the tagged payload value stored alongside vectors
//! - Encoding from any `serde::Serialize` host value and decoding back to
//!   `serde_json::Value`
//! - Point records sent to and read from the service
//! - Distance metrics, health and snapshot descriptors
//! - Client settings
//!
//! ## Usage
//!
//! ```rust
//! use qdrant_types::{decode, encode, Value};
//! use serde_json::json;
//!
//! let tagged = encode(&json!({"tag": "a", "rank": 3}));
//! assert!(matches!(tagged, Value::Struct(_)));
//! assert_eq!(decode(tagged), json!({"tag": "a", "rank": 3}));
//! ```

pub mod collection;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod point;
pub mod service;
pub mod value;

pub use collection::Distance;
pub use config::ClientSettings;
pub use decode::{decode, decode_payload, from_payload, from_value};
pub use encode::{encode, encode_object, encode_payload, integer_from_u64};
pub use error::DataError;
pub use point::{points_from_columns, Point, ScoredColumns, ScoredPoint};
pub use service::{HealthInfo, SnapshotInfo};
pub use value::{Payload, Value};
