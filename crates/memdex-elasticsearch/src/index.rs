//! Index lifecycle: creation with dynamic mapping templates, deletion, listing

use std::sync::Arc;

use memdex::MemoryError;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::client::ElasticsearchClient;
use crate::config::ElasticsearchConfig;
use crate::record::{PAYLOAD_FIELD, VECTOR_FIELD};

/// Custom analyzer: whole value as one token, lowercased
pub const WHOLE_VALUE_ANALYZER: &str = "nalc";

/// Creates, deletes and lists physical indices
#[derive(Clone)]
pub struct IndexManager {
    client: ElasticsearchClient,
    config: Arc<ElasticsearchConfig>,
}

impl IndexManager {
    pub fn new(client: ElasticsearchClient, config: Arc<ElasticsearchConfig>) -> Self {
        Self { client, config }
    }

    pub async fn index_exists(&self, name: &str) -> Result<bool, MemoryError> {
        let response = self.client.head(&[name]).await?;
        Ok(response.is_success())
    }

    /// Create the index unless it already exists
    pub async fn ensure_index(&self, name: &str, vector_dimension: usize) -> Result<(), MemoryError> {
        if self.index_exists(name).await? {
            debug!(index = %name, "Index already exists");
            return Ok(());
        }

        let definition = index_definition(
            self.config.shard_count,
            self.config.replica_count,
            vector_dimension,
        );
        let response = self.client.put_json(&[name], &definition).await?;

        if response.is_success() {
            info!(index = %name, dimension = vector_dimension, "Created index");
            return Ok(());
        }

        // Lost a creation race with another caller: the index is there
        if response.error_type() == Some("resource_already_exists_exception") {
            debug!(index = %name, "Index created concurrently");
            return Ok(());
        }

        let reason = response.error_reason();
        error!(index = %name, error = %reason, "Failed to create index");
        Err(MemoryError::index_operation(
            name,
            format!("Failed to create index: {reason}"),
        ))
    }

    /// Delete the index; failures are logged, never raised
    pub async fn delete_index(&self, name: &str) {
        match self.client.delete(&[name]).await {
            Ok(response) if response.is_success() => info!(index = %name, "Deleted index"),
            Ok(response) => {
                warn!(index = %name, error = %response.error_reason(), "Failed to delete index")
            }
            Err(e) => warn!(index = %name, error = %e, "Failed to delete index"),
        }
    }

    /// Names of all indices starting with `prefix`
    pub async fn list_index_names(&self, prefix: &str) -> Result<Vec<String>, MemoryError> {
        let pattern = format!("{prefix}*");
        let response = self.client.get(&[&pattern]).await?;

        if response.is_index_not_found() {
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(MemoryError::index_operation(&pattern, response.error_reason()));
        }

        let mut names: Vec<String> = response
            .body
            .as_object()
            .map(|indices| indices.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }

    /// Delete every index starting with `prefix`, returning how many were targeted
    pub async fn purge_indices_with_prefix(&self, prefix: &str) -> Result<usize, MemoryError> {
        let names = self.list_index_names(prefix).await?;
        for name in &names {
            self.delete_index(name).await;
        }
        info!(prefix = %prefix, count = names.len(), "Purged indices");
        Ok(names.len())
    }

    /// Mapping of an index, or `None` when it cannot be read
    pub async fn get_index_mapping(&self, name: &str) -> Option<Value> {
        let response = match self.client.get(&[name, "_mapping"]).await {
            Ok(response) => response,
            Err(e) => {
                error!(index = %name, error = %e, "Failed to retrieve mapping");
                return None;
            }
        };

        if !response.is_success() {
            error!(index = %name, error = %response.error_reason(), "Failed to retrieve mapping");
            return None;
        }

        response.body.pointer(&format!("/{name}/mappings")).cloned()
    }
}

/// Settings and mappings used to create a memory index
pub fn index_definition(shards: u32, replicas: u32, vector_dimension: usize) -> Value {
    json!({
        "settings": {
            "number_of_shards": shards,
            "number_of_replicas": replicas,
            "analysis": {
                "analyzer": {
                    WHOLE_VALUE_ANALYZER: {
                        "type": "custom",
                        "tokenizer": "keyword",
                        "filter": ["lowercase"]
                    }
                }
            }
        },
        "mappings": {
            "dynamic_templates": [
                {
                    "tags": {
                        "match": "tag_*",
                        "mapping": {
                            "type": "text",
                            "analyzer": "standard",
                            "index": true,
                            "store": true,
                            "fields": {
                                "keyword": { "type": "keyword" },
                                "na": { "type": "text", "analyzer": WHOLE_VALUE_ANALYZER },
                                "english": { "type": "text", "analyzer": "english" }
                            }
                        }
                    }
                },
                {
                    "txt": {
                        "match": "txt_*",
                        "mapping": {
                            "type": "text",
                            "analyzer": "standard",
                            "index": true,
                            "store": true,
                            "fields": {
                                "keyword": { "type": "keyword" },
                                "english": { "type": "text", "analyzer": "english" }
                            }
                        }
                    }
                }
            ],
            "properties": {
                VECTOR_FIELD: {
                    "type": "dense_vector",
                    "dims": vector_dimension,
                    "index": true,
                    "similarity": "cosine"
                },
                PAYLOAD_FIELD: {
                    "type": "text",
                    "index": false,
                    "store": true
                }
            }
        }
    })
}
