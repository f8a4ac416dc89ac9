//! Host value to [`Value`] encoding.
//!
//! Encoding drives the host value's `Serialize` impl directly into a
//! [`ValueSerializer`], mapping each serde data model type onto a tagged kind:
//!
//! | host shape | tagged value |
//! |---|---|
//! | string, `char` | `String` |
//! | any signed or unsigned integer | `Integer` |
//! | any float, including NaN and infinities | `Double` |
//! | bool | `Bool` |
//! | `Vec`, slice, array, tuple, byte string | `List` |
//! | map with string, integer or bool keys, named-field struct | `Struct` |
//! | empty struct / empty map | `Struct` with no fields |
//! | everything else | `Null` |
//!
//! "Everything else" covers `None`, `()`, unit structs, 128-bit integers
//! outside the 64-bit range, maps whose keys cannot be rendered as strings,
//! and values whose `Serialize` impl fails. Encoding never returns an error:
//! unsupported values are silently stored as null.
//!
//! Enums follow serde's external tagging: a unit variant becomes its name,
//! a data-carrying variant a single-field struct keyed by the variant name.
//! Integer map keys are written in decimal after the same 64-bit
//! reinterpretation as integer values.

use std::collections::HashMap;
use std::fmt;

use serde::ser;
use serde::Serialize;
use serde_json::Number;

use crate::error::DataError;
use crate::value::{Payload, Value};

/// Encode any serializable host value.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Value {
    value.serialize(ValueSerializer).unwrap_or(Value::Null)
}

/// Encode a payload map key by key.
///
/// Each field is encoded independently, so one unsupported field becomes
/// null without affecting its siblings.
pub fn encode_payload<I, K, V>(fields: I) -> Payload
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Serialize,
{
    fields
        .into_iter()
        .map(|(key, value)| (key.into(), encode(&value)))
        .collect()
}

/// Encode a record that must become a struct, returning its fields.
pub fn encode_object<T: Serialize + ?Sized>(value: &T) -> Result<Payload, DataError> {
    match encode(value) {
        Value::Struct(fields) => Ok(fields),
        other => Err(DataError::PayloadNotObject(other.kind())),
    }
}

/// Convert an unsigned integer to the wire's signed representation.
///
/// Values above `i64::MAX` are reinterpreted as two's complement and come
/// back negative. This keeps payloads bit-compatible with data written by
/// clients that stored the raw 64 bits.
pub fn integer_from_u64(u: u64) -> i64 {
    u as i64
}

/// Reason a host value could not be encoded. Never escapes [`encode`].
#[derive(Debug)]
pub struct EncodeError(String);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for EncodeError {}

impl ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError(msg.to_string())
    }
}

/// Serde serializer whose output is a tagged [`Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

fn variant(name: &'static str, value: Value) -> Value {
    let mut fields = HashMap::with_capacity(1);
    fields.insert(name.to_string(), value);
    Value::Struct(fields)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = EncodeError;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeStruct;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, EncodeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, EncodeError> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| EncodeError(format!("integer {v} out of range")))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, EncodeError> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, EncodeError> {
        Ok(Value::Integer(integer_from_u64(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, EncodeError> {
        u64::try_from(v)
            .map(|u| Value::Integer(integer_from_u64(u)))
            .map_err(|_| EncodeError(format!("integer {v} out of range")))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, EncodeError> {
        Ok(Value::Double(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, EncodeError> {
        Ok(Value::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, EncodeError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, EncodeError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, EncodeError> {
        Ok(Value::List(
            v.iter().map(|b| Value::Integer((*b).into())).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, EncodeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, EncodeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, EncodeError> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        name: &'static str,
        value: &T,
    ) -> Result<Value, EncodeError> {
        Ok(variant(name, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList, EncodeError> {
        Ok(SerializeList {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeList, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        name: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, EncodeError> {
        Ok(SerializeTupleVariant {
            name,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeStruct, EncodeError> {
        Ok(SerializeStruct {
            fields: HashMap::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeStruct, EncodeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        name: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant, EncodeError> {
        Ok(SerializeStructVariant {
            name,
            fields: HashMap::with_capacity(len),
        })
    }
}

pub struct SerializeList {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeList {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::List(self.items))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodeError> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeTupleVariant {
    name: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(variant(self.name, Value::List(self.items)))
    }
}

pub struct SerializeStruct {
    fields: HashMap<String, Value>,
    next_key: Option<String>,
}

/// Render a map key as a string. Keys must encode to a string, an integer
/// or a bool.
fn map_key<T: ?Sized + Serialize>(key: &T) -> Result<String, EncodeError> {
    match key.serialize(ValueSerializer)? {
        Value::String(s) => Ok(s),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(EncodeError(format!(
            "map key must be a string, got {}",
            other.kind()
        ))),
    }
}

impl ser::SerializeMap for SerializeStruct {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodeError> {
        self.next_key = Some(map_key(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| EncodeError("map value without a key".to_string()))?;
        self.fields.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Struct(self.fields))
    }
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.fields
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(Value::Struct(self.fields))
    }
}

pub struct SerializeStructVariant {
    name: &'static str,
    fields: HashMap<String, Value>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.fields
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodeError> {
        Ok(variant(self.name, Value::Struct(self.fields)))
    }
}

fn encode_number(number: &Number) -> Value {
    if let Some(i) = number.as_i64() {
        Value::Integer(i)
    } else if let Some(u) = number.as_u64() {
        Value::Integer(integer_from_u64(u))
    } else if let Some(f) = number.as_f64() {
        Value::Double(f)
    } else {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => encode_number(&n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Struct(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}
