//! Document writes: index, bulk index, delete, delete by document id, get

use std::sync::Arc;

use memdex::{MemoryError, MemoryRecord, RESERVED_DOCUMENT_ID_TAG};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::client::ElasticsearchClient;
use crate::config::ElasticsearchConfig;
use crate::dsl::Query;
use crate::filter::TAG_FIELD_PREFIX;
use crate::record::{from_indexable_document, to_indexable_document};

/// Writes memory records into existing indices
#[derive(Clone)]
pub struct DocumentStore {
    client: ElasticsearchClient,
    config: Arc<ElasticsearchConfig>,
}

impl DocumentStore {
    pub fn new(client: ElasticsearchClient, config: Arc<ElasticsearchConfig>) -> Self {
        Self { client, config }
    }

    async fn require_index(&self, index: &str) -> Result<(), MemoryError> {
        let response = self.client.head(&[index]).await?;
        if response.is_success() {
            Ok(())
        } else if response.status == StatusCode::NOT_FOUND {
            Err(MemoryError::IndexNotFound(index.to_string()))
        } else {
            let reason = response.error_reason();
            error!(index = %index, error = %reason, "Index existence check failed");
            Err(MemoryError::index_operation(index, reason))
        }
    }

    /// Index a single record under its id
    pub async fn index_record(&self, index: &str, record: &MemoryRecord) -> Result<(), MemoryError> {
        self.require_index(index).await?;

        let document = to_indexable_document(record, &self.config.indexable_payload_properties)?;
        let response = self
            .client
            .put_json(&[index, "_doc", &record.id], &Value::Object(document))
            .await?;

        if !response.is_success() {
            let reason = response.error_reason();
            error!(id = %record.id, index = %index, error = %reason, "Failed indexing memory record");
            return Err(MemoryError::index_operation(
                index,
                format!("Failed indexing memory record id {} - {reason}", record.id),
            ));
        }

        debug!(id = %record.id, index = %index, "Indexed memory record");
        Ok(())
    }

    /// Index many records in one bulk request; every item failure is reported
    pub async fn bulk_index_records(&self, index: &str, records: &[MemoryRecord]) -> Result<(), MemoryError> {
        self.require_index(index).await?;

        if records.is_empty() {
            return Ok(());
        }

        let mut body = String::new();
        for record in records {
            let document = to_indexable_document(record, &self.config.indexable_payload_properties)?;
            body.push_str(&json!({ "index": { "_id": record.id } }).to_string());
            body.push('\n');
            body.push_str(&Value::Object(document).to_string());
            body.push('\n');
        }

        let response = self.client.post_ndjson(&[index, "_bulk"], body).await?;
        if !response.is_success() {
            let reason = response.error_reason();
            error!(index = %index, error = %reason, "Bulk request failed");
            return Err(MemoryError::index_operation(index, reason));
        }

        let errors = bulk_item_errors(&response.body);
        if !errors.is_empty() {
            for item in &errors {
                error!(index = %index, error = %item, "Bulk item failed");
            }
            return Err(MemoryError::BulkWrite {
                index: index.to_string(),
                errors,
            });
        }

        debug!(index = %index, count = records.len(), "Bulk indexed memory records");
        Ok(())
    }

    /// Delete a record; a missing record is fine, a missing index is not
    pub async fn delete_record(&self, index: &str, id: &str) -> Result<(), MemoryError> {
        let response = self.client.delete(&[index, "_doc", id]).await?;

        if response.is_success() {
            debug!(id = %id, index = %index, "Deleted memory record");
            return Ok(());
        }
        if response.is_index_not_found() {
            return Err(MemoryError::IndexNotFound(index.to_string()));
        }
        if response.body.get("result").and_then(Value::as_str) == Some("not_found") {
            debug!(id = %id, index = %index, "Memory record already absent");
            return Ok(());
        }

        let reason = response.error_reason();
        error!(id = %id, index = %index, error = %reason, "Failed deleting memory record");
        Err(MemoryError::index_operation(
            index,
            format!("Failed deleting memory record id {id} - {reason}"),
        ))
    }

    /// Delete every record tagged with `document_id`
    pub async fn delete_by_document_id(&self, index: &str, document_id: &str) -> Result<u64, MemoryError> {
        self.require_index(index).await?;

        // Recently indexed records must be visible to the delete query
        let refresh = self.client.post_empty(&[index, "_refresh"]).await?;
        if !refresh.is_success() {
            warn!(index = %index, error = %refresh.error_reason(), "Refresh before delete failed");
        }

        let query = Query::term(
            format!("{TAG_FIELD_PREFIX}{RESERVED_DOCUMENT_ID_TAG}.keyword"),
            document_id,
        );
        let request = self
            .client
            .request(reqwest::Method::POST, &[index, "_delete_by_query"])
            .query(&[("refresh", "true")])
            .json(&json!({ "query": query }));
        let response = self.client.send(request).await?;

        if !response.is_success() {
            let reason = response.error_reason();
            error!(document_id = %document_id, index = %index, error = %reason, "Failed deleting document records");
            return Err(MemoryError::index_operation(
                index,
                format!("Failed deleting documents with documentId {document_id} - {reason}"),
            ));
        }

        // A partial delete would leave stale records next to the replacements
        let failures = delete_by_query_failures(&response.body);
        if !failures.is_empty() {
            let reason = failures.join("; ");
            error!(document_id = %document_id, index = %index, error = %reason, "Document records not fully deleted");
            return Err(MemoryError::index_operation(
                index,
                format!("Failed deleting documents with documentId {document_id} - {reason}"),
            ));
        }

        let deleted = response.body.get("deleted").and_then(Value::as_u64).unwrap_or(0);
        debug!(document_id = %document_id, index = %index, deleted = deleted, "Deleted document records");
        Ok(deleted)
    }

    /// Fetch one record; failures are logged and reported as `None`
    pub async fn get_record(&self, index: &str, id: &str, with_vector: bool) -> Option<MemoryRecord> {
        let response = match self.client.get(&[index, "_doc", id]).await {
            Ok(response) => response,
            Err(e) => {
                error!(id = %id, index = %index, error = %e, "Failed to get memory record");
                return None;
            }
        };

        if !response.is_success() {
            if response.body.get("found").and_then(Value::as_bool) != Some(false) {
                error!(id = %id, index = %index, error = %response.error_reason(), "Failed to get memory record");
            }
            return None;
        }

        let source = response.body.get("_source").and_then(Value::as_object)?;
        match from_indexable_document(source, with_vector) {
            Ok(record) => Some(record),
            Err(e) => {
                error!(id = %id, index = %index, error = %e, "Stored memory record is unreadable");
                None
            }
        }
    }
}

/// Failure reasons of a bulk response, one entry per failed item
fn bulk_item_errors(body: &Value) -> Vec<String> {
    if body.get("errors").and_then(Value::as_bool) != Some(true) {
        return Vec::new();
    }

    let errors: Vec<String> = body
        .get("items")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.as_object()?.values().next())
        .filter_map(|result| {
            let error = result.get("error")?;
            let id = result.get("_id").and_then(Value::as_str).unwrap_or("<unknown>");
            Some(format!(
                "Failed indexing memory record id {id} - {}",
                engine_reason(error)
            ))
        })
        .collect();

    if errors.is_empty() {
        vec!["Bulk request reported errors without item details".to_string()]
    } else {
        errors
    }
}

/// Reasons a delete-by-query left matching documents behind
fn delete_by_query_failures(body: &Value) -> Vec<String> {
    let mut failures: Vec<String> = body
        .get("failures")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|failure| {
            let cause = failure.get("cause").unwrap_or(failure);
            match failure.get("id").and_then(Value::as_str) {
                Some(id) => format!("record id {id} - {}", engine_reason(cause)),
                None => engine_reason(cause).to_string(),
            }
        })
        .collect();

    let conflicts = body.get("version_conflicts").and_then(Value::as_u64).unwrap_or(0);
    if conflicts > 0 && failures.is_empty() {
        failures.push(format!("{conflicts} version conflicts"));
    }
    failures
}

fn engine_reason(error: &Value) -> &str {
    error
        .get("reason")
        .and_then(Value::as_str)
        .or_else(|| error.get("type").and_then(Value::as_str))
        .unwrap_or("unknown error")
}
