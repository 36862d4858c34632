//! Conversion between memory records and indexable documents
//!
//! Document layout:
//!
//! | field       | content                                              |
//! |-------------|------------------------------------------------------|
//! | `id`        | record id                                            |
//! | `tag_<key>` | list of tag values                                   |
//! | `txt_<key>` | string payload value, for configured keys only       |
//! | `payload`   | the whole payload serialized as a JSON string        |
//! | `vector`    | embedding                                            |

use std::collections::BTreeMap;

use memdex::{MemoryError, MemoryRecord, PayloadValue};
use serde_json::{Map, Value};

use crate::filter::TAG_FIELD_PREFIX;

/// Field prefix of full-text projections of payload values
pub const TEXT_FIELD_PREFIX: &str = "txt_";

pub const ID_FIELD: &str = "id";
pub const PAYLOAD_FIELD: &str = "payload";
pub const VECTOR_FIELD: &str = "vector";

/// Encode a record as an indexable document
pub fn to_indexable_document(
    record: &MemoryRecord,
    indexable_payload_keys: &[String],
) -> Result<Map<String, Value>, MemoryError> {
    reject_non_finite(record)?;

    let mut document = Map::new();
    document.insert(ID_FIELD.to_string(), Value::String(record.id.clone()));

    for (key, values) in &record.tags {
        document.insert(format!("{TAG_FIELD_PREFIX}{key}"), serde_json::to_value(values)?);
    }

    // Only string values are searchable text; everything else stays in the blob
    for key in indexable_payload_keys {
        if let Some(PayloadValue::String(text)) = record.payload.get(key) {
            document.insert(format!("{TEXT_FIELD_PREFIX}{key}"), Value::String(text.clone()));
        }
    }

    document.insert(
        PAYLOAD_FIELD.to_string(),
        Value::String(serde_json::to_string(&record.payload)?),
    );
    document.insert(VECTOR_FIELD.to_string(), serde_json::to_value(&record.vector)?);

    Ok(document)
}

/// Decode a stored document; the vector is only copied when `with_vector`
pub fn from_indexable_document(
    document: &Map<String, Value>,
    with_vector: bool,
) -> Result<MemoryRecord, MemoryError> {
    let id = document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| MemoryError::Serialization("Document has no string `id` field".to_string()))?
        .to_string();

    let payload = match document.get(PAYLOAD_FIELD) {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::String(blob)) => serde_json::from_str(blob).map_err(|e| {
            MemoryError::Serialization(format!("Invalid payload for record {id}: {e}"))
        })?,
        Some(other) => {
            return Err(MemoryError::Serialization(format!(
                "Payload of record {id} is not a string blob: {other}"
            )))
        }
    };

    let mut tags = BTreeMap::new();
    for (field, value) in document {
        if let Some(key) = field.strip_prefix(TAG_FIELD_PREFIX) {
            tags.insert(key.to_string(), tag_values(&id, field, value)?);
        }
    }

    let vector = if with_vector {
        match document.get(VECTOR_FIELD) {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                MemoryError::Serialization(format!("Invalid vector for record {id}: {e}"))
            })?,
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };

    Ok(MemoryRecord {
        id,
        vector,
        tags,
        payload,
    })
}

/// JSON has no NaN or infinity; such values would be stored as `null`
fn reject_non_finite(record: &MemoryRecord) -> Result<(), MemoryError> {
    if let Some((key, _)) = record
        .payload
        .iter()
        .find(|(_, value)| matches!(value, PayloadValue::Number(n) if !n.is_finite()))
    {
        return Err(MemoryError::Serialization(format!(
            "Payload property {key} of record {} is not a finite number",
            record.id
        )));
    }
    if record.vector.iter().any(|v| !v.is_finite()) {
        return Err(MemoryError::Serialization(format!(
            "Vector of record {} holds a non-finite value",
            record.id
        )));
    }
    Ok(())
}

/// Tag values as stored; a bare string counts as a single value
fn tag_values(id: &str, field: &str, value: &Value) -> Result<Vec<String>, MemoryError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    MemoryError::Serialization(format!(
                        "Tag field {field} of record {id} holds a non-string value"
                    ))
                })
            })
            .collect(),
        other => Err(MemoryError::Serialization(format!(
            "Tag field {field} of record {id} is not a list: {other}"
        ))),
    }
}
