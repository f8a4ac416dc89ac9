//! Point records sent to and returned by the service.

use serde::Serialize;
use serde_json::Map;

use crate::encode::{encode, encode_object, encode_payload};
use crate::error::DataError;
use crate::value::Payload;

/// A point to upsert: identifier, dense vector and optional payload.
///
/// The identifier is sent to the service as a UUID string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    /// Point identifier (UUID string)
    pub id: String,
    /// Dense vector
    pub vector: Vec<f32>,
    /// Optional payload
    pub payload: Option<Payload>,
}

impl Point {
    /// Create a point without payload.
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            payload: None,
        }
    }

    /// Set the payload, encoding each field independently.
    pub fn with_payload<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        self.payload = Some(encode_payload(fields));
        self
    }

    /// Add or replace a single payload field.
    pub fn with_field<V: Serialize + ?Sized>(mut self, key: impl Into<String>, value: &V) -> Self {
        self.payload
            .get_or_insert_with(Payload::new)
            .insert(key.into(), encode(value));
        self
    }

    /// Use a whole record as the payload. The record must encode to a struct.
    pub fn try_with_payload_object<T: Serialize + ?Sized>(
        mut self,
        record: &T,
    ) -> Result<Self, DataError> {
        self.payload = Some(encode_object(record)?);
        Ok(self)
    }
}

/// Build points from parallel columns.
///
/// `vectors`, `ids` and, when present, `payloads` must have the same length.
pub fn points_from_columns(
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
    payloads: Option<Vec<Map<String, serde_json::Value>>>,
) -> Result<Vec<Point>, DataError> {
    if ids.len() != vectors.len() {
        return Err(DataError::LengthMismatch {
            field: "ids",
            expected: vectors.len(),
            actual: ids.len(),
        });
    }
    if let Some(payloads) = &payloads {
        if payloads.len() != vectors.len() {
            return Err(DataError::LengthMismatch {
                field: "payloads",
                expected: vectors.len(),
                actual: payloads.len(),
            });
        }
    }

    let mut payloads = payloads.map(Vec::into_iter);
    let points = ids
        .into_iter()
        .zip(vectors)
        .map(|(id, vector)| {
            let point = Point::new(id, vector);
            match payloads.as_mut().and_then(Iterator::next) {
                Some(fields) => point.with_payload(fields),
                None => point,
            }
        })
        .collect();
    Ok(points)
}

/// A search hit with its payload decoded to host values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoredPoint {
    pub id: String,
    /// Empty when the service did not return vectors
    pub vector: Vec<f32>,
    /// Never absent: a point without payload has an empty map
    pub payload: Map<String, serde_json::Value>,
    pub score: f32,
}

/// Index-parallel view of a search result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoredColumns {
    pub ids: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
    pub payloads: Vec<Map<String, serde_json::Value>>,
    pub scores: Vec<f32>,
}

impl From<Vec<ScoredPoint>> for ScoredColumns {
    fn from(points: Vec<ScoredPoint>) -> Self {
        let mut columns = ScoredColumns {
            ids: Vec::with_capacity(points.len()),
            vectors: Vec::with_capacity(points.len()),
            payloads: Vec::with_capacity(points.len()),
            scores: Vec::with_capacity(points.len()),
        };
        for point in points {
            columns.ids.push(point.id);
            columns.vectors.push(point.vector);
            columns.payloads.push(point.payload);
            columns.scores.push(point.score);
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    const ID_A: &str = "11111111-1111-1111-1111-111111111111";
    const ID_B: &str = "22222222-2222-2222-2222-222222222222";

    fn object(value: serde_json::Value) -> Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_point_builders() {
        let point = Point::new(ID_A, vec![1.0, 0.0])
            .with_payload([("tag", "a")])
            .with_field("rank", &3u8);

        let payload = point.payload.unwrap();
        assert_eq!(payload["tag"], Value::String("a".to_string()));
        assert_eq!(payload["rank"], Value::Integer(3));
    }

    #[test]
    fn test_point_without_payload() {
        let point = Point::new(ID_A, vec![0.5]);
        assert!(point.payload.is_none());
    }

    #[test]
    fn test_try_with_payload_object() {
        let point = Point::new(ID_A, vec![1.0])
            .try_with_payload_object(&json!({"lang": "rust"}))
            .unwrap();
        assert_eq!(point.payload.unwrap()["lang"], Value::String("rust".to_string()));

        let err = Point::new(ID_A, vec![1.0])
            .try_with_payload_object("just text")
            .unwrap_err();
        assert!(matches!(err, DataError::PayloadNotObject("string")));
    }

    #[test]
    fn test_points_from_columns() {
        let points = points_from_columns(
            vec![ID_A.to_string(), ID_B.to_string()],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            Some(vec![object(json!({"tag": "a"})), object(json!({"tag": "b"}))]),
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id, ID_A);
        assert_eq!(points[1].vector, vec![0.0, 1.0]);
        assert_eq!(
            points[1].payload.as_ref().unwrap()["tag"],
            Value::String("b".to_string())
        );
    }

    #[test]
    fn test_points_from_columns_without_payloads() {
        let points =
            points_from_columns(vec![ID_A.to_string()], vec![vec![1.0]], None).unwrap();
        assert!(points[0].payload.is_none());
    }

    #[test]
    fn test_points_from_columns_id_mismatch() {
        let err = points_from_columns(
            vec![ID_A.to_string(), ID_B.to_string()],
            vec![vec![1.0], vec![2.0], vec![3.0]],
            None,
        )
        .unwrap_err();

        match err {
            DataError::LengthMismatch {
                field,
                expected,
                actual,
            } => {
                assert_eq!(field, "ids");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            points_from_columns(vec![], vec![vec![1.0]], None)
                .unwrap_err()
                .to_string(),
            "Length mismatch: expected 1 ids, got 0"
        );
    }

    #[test]
    fn test_points_from_columns_payload_mismatch() {
        let err = points_from_columns(
            vec![ID_A.to_string()],
            vec![vec![1.0]],
            Some(vec![Map::new(), Map::new()]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::LengthMismatch {
                field: "payloads",
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_scored_columns_are_index_parallel() {
        let hits = vec![
            ScoredPoint {
                id: ID_B.to_string(),
                vector: vec![0.0, 1.0],
                payload: object(json!({"tag": "b"})),
                score: 0.9,
            },
            ScoredPoint {
                id: ID_A.to_string(),
                vector: vec![1.0, 0.0],
                payload: Map::new(),
                score: 0.1,
            },
        ];

        let columns = ScoredColumns::from(hits);
        assert_eq!(columns.ids, vec![ID_B.to_string(), ID_A.to_string()]);
        assert_eq!(columns.scores, vec![0.9, 0.1]);
        assert_eq!(columns.payloads[0]["tag"], json!("b"));
        assert!(columns.payloads[1].is_empty());
        assert_eq!(columns.vectors.len(), 2);
    }
}
