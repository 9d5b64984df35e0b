//! Conversion between typed documents and field maps.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, InvalidArgumentError, StoreError};

/// A document body: field name to JSON value.
pub type Fields = serde_json::Map<String, Value>;

/// Name of the identifier key in flat record renderings.
///
/// Never writable: stores assign it, and inputs carrying it are rejected.
pub const ID_FIELD: &str = "id";

/// Serialize a document or patch into a field map.
///
/// # Errors
///
/// Returns [`InvalidArgumentError::NotAnObject`] if the value does not
/// serialize to a JSON object.
pub fn to_fields<T: Serialize + ?Sized>(value: &T) -> Result<Fields, Error> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(InvalidArgumentError::NotAnObject {
            reason: format!("got {}", kind_of(&other)),
        }
        .into()),
        Err(e) => Err(InvalidArgumentError::NotAnObject {
            reason: e.to_string(),
        }
        .into()),
    }
}

/// Decode stored fields into a typed document.
///
/// # Errors
///
/// Returns [`StoreError::Malformed`] if the stored fields do not match `T`.
pub fn from_fields<T: DeserializeOwned>(fields: Fields) -> Result<T, Error> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        StoreError::Malformed {
            message: e.to_string(),
        }
        .into()
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
