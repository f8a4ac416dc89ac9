//! [`Value`] to host value decoding.
//!
//! The host representation is `serde_json::Value`. Integers come back as
//! 64-bit signed numbers and doubles as 64-bit floats regardless of the width
//! they were encoded from. Doubles that are NaN or infinite have no JSON form
//! and decode to `null`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number};

use crate::error::DataError;
use crate::value::{Payload, Value};

/// Decode a tagged value into an untyped host value.
pub fn decode(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(Number::from(i)),
        Value::Double(d) => Number::from_f64(d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::List(items) => serde_json::Value::Array(items.into_iter().map(decode).collect()),
        Value::Struct(fields) => serde_json::Value::Object(decode_payload(fields)),
    }
}

/// Decode every field of a payload. An empty payload yields an empty map.
pub fn decode_payload(payload: Payload) -> Map<String, serde_json::Value> {
    payload
        .into_iter()
        .map(|(key, value)| (key, decode(value)))
        .collect()
}

/// Decode a tagged value straight into a typed record.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, DataError> {
    Ok(serde_json::from_value(decode(value))?)
}

/// Decode a payload into a typed record.
pub fn from_payload<T: DeserializeOwned>(payload: Payload) -> Result<T, DataError> {
    Ok(serde_json::from_value(serde_json::Value::Object(
        decode_payload(payload),
    ))?)
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        decode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Chunk {
        text: String,
        offset: u32,
        score: f64,
        labels: Vec<String>,
        source: Source,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Source {
        uri: String,
        verified: bool,
    }

    fn sample_chunk() -> Chunk {
        Chunk {
            text: "vectors all the way down".to_string(),
            offset: 128,
            score: 0.75,
            labels: vec!["intro".to_string(), "draft".to_string()],
            source: Source {
                uri: "file:///notes.md".to_string(),
                verified: false,
            },
        }
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode(Value::Null), serde_json::Value::Null);
        assert_eq!(decode(Value::Bool(false)), json!(false));
        assert_eq!(decode(Value::Integer(-5)), json!(-5));
        assert_eq!(decode(Value::Double(0.125)), json!(0.125));
        assert_eq!(decode(Value::String("s".to_string())), json!("s"));
    }

    #[test]
    fn test_decode_non_finite_double_is_null() {
        assert_eq!(decode(Value::Double(f64::NAN)), serde_json::Value::Null);
        assert_eq!(decode(Value::Double(f64::NEG_INFINITY)), serde_json::Value::Null);
    }

    #[test]
    fn test_decode_list_preserves_order_and_length() {
        let value = Value::List(vec![
            Value::String("c".to_string()),
            Value::Null,
            Value::String("a".to_string()),
        ]);
        assert_eq!(decode(value), json!(["c", null, "a"]));
    }

    #[test]
    fn test_decode_struct_preserves_key_set() {
        let mut fields = HashMap::new();
        fields.insert("x".to_string(), Value::Integer(1));
        fields.insert("y".to_string(), Value::Null);
        fields.insert("z".to_string(), Value::List(vec![]));

        let decoded = decode(Value::Struct(fields));
        let object = decoded.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(object.contains_key("x"));
        assert!(object.contains_key("y"));
        assert!(object.contains_key("z"));
    }

    #[test]
    fn test_round_trip_json_shapes() {
        let host = json!({
            "name": "docs",
            "count": 42,
            "ratio": 0.5,
            "negative": -7,
            "enabled": true,
            "nothing": null,
            "nested": {"list": [1, "two", 3.0, [false, {"deep": "yes"}]]},
            "empty_list": [],
            "empty_object": {}
        });
        assert_eq!(decode(encode(&host)), host);
    }

    #[test]
    fn test_round_trip_narrows_integer_widths() {
        assert_eq!(decode(encode(&7u8)), json!(7i64));
        assert_eq!(decode(encode(&-7i16)), json!(-7i64));
        assert_eq!(decode(encode(&1.5f32)), json!(1.5f64));

        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        counts.insert("a".to_string(), 1);
        counts.insert("b".to_string(), 2);
        assert_eq!(decode(encode(&counts)), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_round_trip_typed_record() {
        let chunk = sample_chunk();
        let decoded: Chunk = from_value(encode(&chunk)).unwrap();
        assert_eq!(decoded, chunk);
    }

    #[test]
    fn test_from_payload() {
        let payload = match encode(&sample_chunk()) {
            Value::Struct(fields) => fields,
            other => panic!("expected struct, got {}", other.kind()),
        };
        let decoded: Chunk = from_payload(payload).unwrap();
        assert_eq!(decoded.offset, 128);
    }

    #[test]
    fn test_from_value_type_mismatch_is_error() {
        let result: Result<Chunk, _> = from_value(Value::Integer(3));
        assert!(matches!(result, Err(DataError::Serialization(_))));
    }

    #[test]
    fn test_decode_payload_empty() {
        assert!(decode_payload(Payload::new()).is_empty());
    }
}
