//! Query execution with refresh-before-search
//!
//! Every read refreshes the index first so writes made just before are
//! visible. Searching an index that does not exist yields no hits.

use memdex::MemoryError;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use crate::client::ElasticsearchClient;
use crate::dsl::Query;

/// One search hit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

/// Runs searches and counts against an index
#[derive(Clone)]
pub struct QueryExecutor {
    client: ElasticsearchClient,
}

impl QueryExecutor {
    pub fn new(client: ElasticsearchClient) -> Self {
        Self { client }
    }

    /// Make pending writes visible to search
    pub async fn refresh(&self, index: &str) -> Result<(), MemoryError> {
        let response = self.client.post_empty(&[index, "_refresh"]).await?;
        if !response.is_success() && !response.is_index_not_found() {
            debug!(index = %index, error = %response.error_reason(), "Refresh failed");
        }
        Ok(())
    }

    /// Return at most `limit` hits, starting at the first
    pub async fn execute(&self, index: &str, limit: usize, query: &Query) -> Result<Vec<SearchHit>, MemoryError> {
        self.refresh(index).await?;

        let body = json!({
            "query": query,
            "from": 0,
            "size": limit
        });
        debug!(index = %index, limit = limit, "Executing search");
        let response = self.client.post_json(&[index, "_search"], &body).await?;

        if response.is_index_not_found() {
            debug!(index = %index, "Search on missing index, returning no hits");
            return Ok(Vec::new());
        }
        if !response.is_success() {
            let reason = response.error_reason();
            error!(index = %index, error = %reason, "Search failed");
            return Err(MemoryError::index_operation(index, reason));
        }

        let parsed: SearchResponse = serde_json::from_value(response.body)?;
        Ok(parsed.hits.hits)
    }

    /// Number of documents matching `query`
    pub async fn count(&self, index: &str, query: &Query) -> Result<u64, MemoryError> {
        self.refresh(index).await?;

        let body = json!({ "query": query });
        let response = self.client.post_json(&[index, "_count"], &body).await?;

        if response.is_index_not_found() {
            return Ok(0);
        }
        if !response.is_success() {
            let reason = response.error_reason();
            error!(index = %index, error = %reason, "Count failed");
            return Err(MemoryError::index_operation(index, reason));
        }

        let parsed: CountResponse = serde_json::from_value(response.body)?;
        Ok(parsed.count)
    }
}
