//! MemoryRecord - The unit stored in a memory index
//!
//! Pure domain entity without infrastructure dependencies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PayloadValue;

/// Tag key that groups all records belonging to one logical document
pub const RESERVED_DOCUMENT_ID_TAG: &str = "__document_id";

/// MemoryRecord - A vector, its tags and an opaque payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Identifier, unique within an index; upserting the same id replaces the record
    pub id: String,
    /// Embedding vector (empty when a read did not request vectors)
    #[serde(default)]
    pub vector: Vec<f32>,
    /// Multi-valued labels used for filtering
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<String>>,
    /// Free-form data stored alongside the vector
    #[serde(default)]
    pub payload: BTreeMap<String, PayloadValue>,
}

impl MemoryRecord {
    /// Create an empty record with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Create an empty record with a generated id
    pub fn with_random_id() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = vector;
        self
    }

    /// Append a value to a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.entry(key.into()).or_default().push(value.into());
        self
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Mark the record as part of a multi-record document
    pub fn with_document_id(self, document_id: impl Into<String>) -> Self {
        self.with_tag(RESERVED_DOCUMENT_ID_TAG, document_id)
    }

    /// Document id carried by the reserved tag, if any
    pub fn document_id(&self) -> Option<&str> {
        self.tags
            .get(RESERVED_DOCUMENT_ID_TAG)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
