//! Elasticsearch-backed `MemoryDb`

use std::sync::Arc;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{stream, StreamExt};
use memdex::domain::effective_limit;
use memdex::{
    EmbeddingGenerator, MemoryDb, MemoryError, MemoryFilter, MemoryRecord, RecordStream,
    ScoredRecordStream,
};
use tracing::{debug, error, info};

use crate::client::ElasticsearchClient;
use crate::config::ElasticsearchConfig;
use crate::documents::DocumentStore;
use crate::dsl::Query;
use crate::filter::translate_filters;
use crate::index::IndexManager;
use crate::query::{QueryExecutor, SearchHit};
use crate::record::{from_indexable_document, TEXT_FIELD_PREFIX, VECTOR_FIELD};

/// Memory store backed by an Elasticsearch cluster.
///
/// Logical index names are prefixed with `index_prefix` and have `_`
/// replaced by `-` before they reach the engine.
pub struct ElasticsearchMemory {
    config: Arc<ElasticsearchConfig>,
    indices: IndexManager,
    documents: DocumentStore,
    queries: QueryExecutor,
    embedding: Arc<dyn EmbeddingGenerator>,
}

/// Builder for [`ElasticsearchMemory`]
pub struct ElasticsearchMemoryBuilder {
    config: ElasticsearchConfig,
    embedding: Option<Arc<dyn EmbeddingGenerator>>,
}

impl ElasticsearchMemoryBuilder {
    pub fn embedding_generator(mut self, generator: Arc<dyn EmbeddingGenerator>) -> Self {
        self.embedding = Some(generator);
        self
    }

    /// Build the store; an embedding generator is mandatory
    pub fn build(self) -> Result<ElasticsearchMemory, MemoryError> {
        let embedding = self
            .embedding
            .ok_or(MemoryError::MissingEmbeddingGenerator)?;
        let config = Arc::new(self.config);
        let client = ElasticsearchClient::new(&config)?;

        info!(server = %config.server_address, prefix = %config.index_prefix, "Elasticsearch memory initialized");

        Ok(ElasticsearchMemory {
            indices: IndexManager::new(client.clone(), config.clone()),
            documents: DocumentStore::new(client.clone(), config.clone()),
            queries: QueryExecutor::new(client),
            config,
            embedding,
        })
    }
}

impl ElasticsearchMemory {
    pub fn builder(config: ElasticsearchConfig) -> ElasticsearchMemoryBuilder {
        ElasticsearchMemoryBuilder {
            config,
            embedding: None,
        }
    }

    pub fn new(
        config: ElasticsearchConfig,
        embedding: Arc<dyn EmbeddingGenerator>,
    ) -> Result<Self, MemoryError> {
        Self::builder(config).embedding_generator(embedding).build()
    }

    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }

    /// Direct access to index administration (purge, mapping introspection)
    pub fn index_manager(&self) -> &IndexManager {
        &self.indices
    }

    /// Physical index name for a logical one
    pub fn real_index_name(&self, index: &str) -> Result<String, MemoryError> {
        normalize_index_name(&self.config.index_prefix, index)
    }

    /// Fetch a single record by id
    pub async fn get(&self, index: &str, id: &str, with_vector: bool) -> Result<Option<MemoryRecord>, MemoryError> {
        let index = self.real_index_name(index)?;
        Ok(self.documents.get_record(&index, id, with_vector).await)
    }

    /// Number of records matching `filters`
    pub async fn count(&self, index: &str, filters: &[MemoryFilter]) -> Result<u64, MemoryError> {
        let index = self.real_index_name(index)?;
        self.queries.count(&index, &translate_filters(filters)).await
    }

    fn decode(hit: SearchHit, with_vector: bool) -> Result<Option<MemoryRecord>, MemoryError> {
        match hit.source {
            Some(source) => from_indexable_document(&source, with_vector).map(Some),
            None => {
                error!(id = %hit.id, "Search hit carries no source document");
                Ok(None)
            }
        }
    }

    fn run_query<'a>(&'a self, index: &'a str, limit: usize, query: Query, with_vector: bool) -> RecordStream<'a> {
        try_stream! {
            let index = self.real_index_name(index)?;
            let hits = self.queries.execute(&index, effective_limit(limit), &query).await?;
            for hit in hits {
                if let Some(record) = Self::decode(hit, with_vector)? {
                    yield record;
                }
            }
        }
        .boxed()
    }
}

#[async_trait]
impl MemoryDb for ElasticsearchMemory {
    async fn create_index(&self, index: &str, vector_size: usize) -> Result<(), MemoryError> {
        let index = self.real_index_name(index)?;
        self.indices.ensure_index(&index, vector_size).await
    }

    async fn delete_index(&self, index: &str) -> Result<(), MemoryError> {
        let index = self.real_index_name(index)?;
        self.indices.delete_index(&index).await;
        Ok(())
    }

    async fn list_indexes(&self) -> Result<Vec<String>, MemoryError> {
        let prefix = self.config.index_prefix.replace('_', "-");
        let names = self.indices.list_index_names(&prefix).await?;
        Ok(strip_index_prefix(&prefix, names))
    }

    async fn upsert(&self, index: &str, record: &MemoryRecord) -> Result<String, MemoryError> {
        let index = self.real_index_name(index)?;
        self.documents.index_record(&index, record).await?;
        Ok(record.id.clone())
    }

    async fn upsert_many(&self, index: &str, records: &[MemoryRecord]) -> Result<Vec<String>, MemoryError> {
        let index = self.real_index_name(index)?;
        self.documents.bulk_index_records(&index, records).await?;
        Ok(records.iter().map(|r| r.id.clone()).collect())
    }

    async fn delete(&self, index: &str, record: &MemoryRecord) -> Result<(), MemoryError> {
        let index = self.real_index_name(index)?;
        self.documents.delete_record(&index, &record.id).await
    }

    async fn replace_document(
        &self,
        index: &str,
        document_id: &str,
        records: &[MemoryRecord],
    ) -> Result<Vec<String>, MemoryError> {
        let real_index = self.real_index_name(index)?;
        let deleted = self.documents.delete_by_document_id(&real_index, document_id).await?;
        debug!(document_id = %document_id, deleted = deleted, "Replacing document records");
        self.upsert_many(index, records).await
    }

    fn get_list<'a>(
        &'a self,
        index: &'a str,
        filters: &'a [MemoryFilter],
        limit: usize,
        with_vector: bool,
    ) -> RecordStream<'a> {
        self.run_query(index, limit, translate_filters(filters), with_vector)
    }

    fn get_similar_list<'a>(
        &'a self,
        index: &'a str,
        text: &'a str,
        filters: &'a [MemoryFilter],
        limit: usize,
        with_vector: bool,
    ) -> ScoredRecordStream<'a> {
        try_stream! {
            let index = self.real_index_name(index)?;
            let limit = effective_limit(limit);
            let embedding = self.embedding.generate_embedding(text).await?;
            let query = Query::knn(VECTOR_FIELD, embedding, limit.saturating_mul(2), translate_filters(filters));

            let hits = self.queries.execute(&index, limit, &query).await?;
            for hit in hits {
                let score = hit.score.unwrap_or(0.0);
                if let Some(record) = Self::decode(hit, with_vector)? {
                    yield (record, score);
                }
            }
        }
        .boxed()
    }

    fn search_keyword<'a>(
        &'a self,
        index: &'a str,
        text: &'a str,
        filters: &'a [MemoryFilter],
        limit: usize,
        with_vector: bool,
    ) -> RecordStream<'a> {
        let properties = &self.config.indexable_payload_properties;
        if properties.is_empty() {
            return stream::empty().boxed();
        }

        let full_text = Query::MultiMatch {
            query: text.to_string(),
            fields: properties
                .iter()
                .map(|p| format!("{TEXT_FIELD_PREFIX}{p}"))
                .collect(),
        };
        let query = Query::all_of(vec![full_text, translate_filters(filters)]);
        self.run_query(index, limit, query, with_vector)
    }
}

/// `prefix + name` with underscores turned into hyphens
pub fn normalize_index_name(prefix: &str, name: &str) -> Result<String, MemoryError> {
    if name.trim().is_empty() {
        return Err(MemoryError::invalid_argument("The index name is empty"));
    }
    Ok(format!("{prefix}{name}").replace('_', "-"))
}

/// Logical names of the physical indices that carry `prefix`
fn strip_index_prefix(prefix: &str, names: Vec<String>) -> Vec<String> {
    if prefix.is_empty() {
        return names;
    }
    names
        .into_iter()
        .filter_map(|name| {
            let head = name.get(..prefix.len())?;
            head.eq_ignore_ascii_case(prefix)
                .then(|| name[prefix.len()..].to_string())
        })
        .collect()
}
