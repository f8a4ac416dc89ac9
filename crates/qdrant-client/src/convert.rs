//! Conversions between domain records and wire messages.
//!
//! This is the point codec: points are built into `PointStruct` messages
//! with their payload encoded field by field, and scored points are read
//! back with every payload value decoded to a host value.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Map;

use qdrant_rpc::pb::{
    self, point_id::PointIdOptions, value::Kind, vectors::VectorsOptions,
};
use qdrant_types::{decode_payload, Distance, Payload, Point, ScoredPoint, SnapshotInfo, Value};

/// Convert a tagged value to its wire form.
pub fn value_to_proto(value: Value) -> pb::Value {
    let kind = match value {
        Value::Null => Kind::NullValue(pb::NullValue::NullValue as i32),
        Value::Bool(b) => Kind::BoolValue(b),
        Value::Integer(i) => Kind::IntegerValue(i),
        Value::Double(d) => Kind::DoubleValue(d),
        Value::String(s) => Kind::StringValue(s),
        Value::List(items) => Kind::ListValue(pb::ListValue {
            values: items.into_iter().map(value_to_proto).collect(),
        }),
        Value::Struct(fields) => Kind::StructValue(pb::Struct {
            fields: payload_to_proto(fields),
        }),
    };
    pb::Value { kind: Some(kind) }
}

/// Convert a wire value back to a tagged value. A value with no kind is null.
pub fn value_from_proto(value: pb::Value) -> Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::Integer(i),
        Some(Kind::DoubleValue(d)) => Value::Double(d),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => {
            Value::List(list.values.into_iter().map(value_from_proto).collect())
        }
        Some(Kind::StructValue(st)) => Value::Struct(payload_from_proto(st.fields)),
    }
}

pub fn payload_to_proto(payload: Payload) -> HashMap<String, pb::Value> {
    payload
        .into_iter()
        .map(|(key, value)| (key, value_to_proto(value)))
        .collect()
}

pub fn payload_from_proto(fields: HashMap<String, pb::Value>) -> Payload {
    fields
        .into_iter()
        .map(|(key, value)| (key, value_from_proto(value)))
        .collect()
}

/// Decode a wire payload to host values. Absent payloads are empty maps.
pub fn payload_map(fields: HashMap<String, pb::Value>) -> Map<String, serde_json::Value> {
    decode_payload(payload_from_proto(fields))
}

pub fn point_id(id: impl Into<String>) -> pb::PointId {
    pb::PointId {
        point_id_options: Some(PointIdOptions::Uuid(id.into())),
    }
}

/// Render a point id as a string. Numeric ids are written in decimal.
pub fn point_id_to_string(id: Option<pb::PointId>) -> String {
    match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

fn dense_vectors(vector: Vec<f32>) -> pb::Vectors {
    pb::Vectors {
        vectors_options: Some(VectorsOptions::Vector(pb::Vector { data: vector })),
    }
}

fn dense_vector(vectors: Option<pb::Vectors>) -> Vec<f32> {
    match vectors.and_then(|v| v.vectors_options) {
        Some(VectorsOptions::Vector(vector)) => vector.data,
        None => Vec::new(),
    }
}

/// Build the wire record for a point.
pub fn build_point(point: Point) -> pb::PointStruct {
    pb::PointStruct {
        id: Some(point_id(point.id)),
        payload: point.payload.map(payload_to_proto).unwrap_or_default(),
        vectors: Some(dense_vectors(point.vector)),
    }
}

/// Read a search hit.
pub fn read_point(point: pb::ScoredPoint) -> ScoredPoint {
    ScoredPoint {
        id: point_id_to_string(point.id),
        vector: dense_vector(point.vectors),
        payload: payload_map(point.payload),
        score: point.score,
    }
}

pub fn distance_to_proto(distance: Distance) -> pb::Distance {
    match distance {
        Distance::Euclid => pb::Distance::Euclid,
        Distance::Dot => pb::Distance::Dot,
        Distance::Cosine => pb::Distance::Cosine,
    }
}

pub fn snapshot_from_proto(snapshot: pb::SnapshotDescription) -> SnapshotInfo {
    SnapshotInfo {
        name: snapshot.name,
        size_bytes: snapshot.size,
        created_at: snapshot.creation_time.and_then(timestamp_to_datetime),
        checksum: snapshot.checksum,
    }
}

fn timestamp_to_datetime(ts: prost_types::Timestamp) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(ts.nanos).ok()?;
    DateTime::from_timestamp(ts.seconds, nanos)
}
