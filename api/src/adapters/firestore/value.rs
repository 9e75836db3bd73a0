//! Firestore REST value decoding
//!
//! The REST API wraps every field in a type tag (`{"stringValue": "x"}`,
//! `{"integerValue": "42"}`, ...). These types peel the tags off so the rest
//! of the service sees plain JSON. Native timestamps come out in the same
//! `{seconds, nanoseconds}` shape the client SDKs hand over.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// One typed Firestore value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue(Option<String>),
    BooleanValue(bool),
    /// int64, transported as a decimal string
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

impl FirestoreValue {
    pub fn into_json(self) -> Value {
        match self {
            FirestoreValue::NullValue(_) => Value::Null,
            FirestoreValue::BooleanValue(b) => Value::Bool(b),
            FirestoreValue::IntegerValue(s) => s
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .unwrap_or(Value::String(s)),
            FirestoreValue::DoubleValue(f) => {
                Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
            }
            FirestoreValue::TimestampValue(s) => timestamp_to_json(s),
            FirestoreValue::StringValue(s)
            | FirestoreValue::BytesValue(s)
            | FirestoreValue::ReferenceValue(s) => Value::String(s),
            FirestoreValue::GeoPointValue(p) => {
                serde_json::json!({"latitude": p.latitude, "longitude": p.longitude})
            }
            FirestoreValue::ArrayValue(a) => {
                Value::Array(a.values.into_iter().map(FirestoreValue::into_json).collect())
            }
            FirestoreValue::MapValue(m) => fields_to_json(m.fields),
        }
    }
}

/// RFC 3339 on the wire; kept as text if it ever fails to parse
fn timestamp_to_json(s: String) -> Value {
    match DateTime::parse_from_rfc3339(&s) {
        Ok(dt) => serde_json::json!({
            "seconds": dt.timestamp(),
            "nanoseconds": dt.timestamp_subsec_nanos(),
        }),
        Err(_) => Value::String(s),
    }
}

/// Decode a document's `fields` into a JSON object
pub fn fields_to_json(fields: BTreeMap<String, FirestoreValue>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k, v.into_json()))
            .collect::<Map<String, Value>>(),
    )
}
