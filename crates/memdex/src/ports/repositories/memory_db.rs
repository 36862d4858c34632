//! Memory Database Port
//!
//! The storage capability every memory backend implements. Callers only see
//! logical index names; how a backend maps them to physical names is its own
//! business.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{errors::MemoryError, MemoryFilter, MemoryRecord};

/// Lazy, single-pass sequence of records
pub type RecordStream<'a> = BoxStream<'a, Result<MemoryRecord, MemoryError>>;

/// Lazy, single-pass sequence of records paired with their similarity score
pub type ScoredRecordStream<'a> = BoxStream<'a, Result<(MemoryRecord, f64), MemoryError>>;

/// Storage interface for memory records.
///
/// Streams returned by the query methods do no work until first polled and
/// stop the underlying request when dropped.
#[async_trait]
pub trait MemoryDb: Send + Sync {
    /// Create an index with a fixed vector dimension (no-op when it exists)
    async fn create_index(&self, index: &str, vector_size: usize) -> Result<(), MemoryError>;

    /// Delete an index
    async fn delete_index(&self, index: &str) -> Result<(), MemoryError>;

    /// Logical names of every index owned by this store
    async fn list_indexes(&self) -> Result<Vec<String>, MemoryError>;

    /// Insert or replace a record, returning its id
    async fn upsert(&self, index: &str, record: &MemoryRecord) -> Result<String, MemoryError>;

    /// Insert or replace many records in one batch, returning their ids
    async fn upsert_many(
        &self,
        index: &str,
        records: &[MemoryRecord],
    ) -> Result<Vec<String>, MemoryError>;

    /// Delete a record by id; a record that is already gone is not an error
    async fn delete(&self, index: &str, record: &MemoryRecord) -> Result<(), MemoryError>;

    /// Replace every record of a logical document with `records`
    async fn replace_document(
        &self,
        index: &str,
        document_id: &str,
        records: &[MemoryRecord],
    ) -> Result<Vec<String>, MemoryError>;

    /// Records matching `filters` (OR'ed); `limit == 0` means the default limit
    fn get_list<'a>(
        &'a self,
        index: &'a str,
        filters: &'a [MemoryFilter],
        limit: usize,
        with_vector: bool,
    ) -> RecordStream<'a>;

    /// Records closest to the embedding of `text`, best match first
    fn get_similar_list<'a>(
        &'a self,
        index: &'a str,
        text: &'a str,
        filters: &'a [MemoryFilter],
        limit: usize,
        with_vector: bool,
    ) -> ScoredRecordStream<'a>;

    /// Full-text search over the payload fields the backend indexes
    fn search_keyword<'a>(
        &'a self,
        index: &'a str,
        text: &'a str,
        filters: &'a [MemoryFilter],
        limit: usize,
        with_vector: bool,
    ) -> RecordStream<'a>;
}
