//! Elasticsearch backend for Memdex
//!
//! Stores memory records as documents with a dense vector field, tag fields
//! matched by a dynamic mapping template, optional full-text projections of
//! payload values and the full payload as an opaque blob.
//!
//! # Usage
//!
//! ```rust,ignore
//! use memdex::{MemoryDb, MemoryFilter};
//! use memdex_elasticsearch::{ElasticsearchConfig, ElasticsearchMemory};
//!
//! let config = ElasticsearchConfig::new("http://localhost:9200")
//!     .with_index_prefix("km-")
//!     .with_indexable_payload_properties(["text"]);
//! let memory = ElasticsearchMemory::new(config, embedding_generator)?;
//!
//! memory.create_index("notes", 1536).await?;
//! let filters = [MemoryFilter::new().by_tag("user", "alice")];
//! let mut records = memory.get_list("notes", &filters, 10, false);
//! ```

mod client;
mod config;
mod documents;
mod dsl;
mod filter;
mod index;
mod memory;
mod query;
mod record;

pub use client::{ElasticsearchClient, EngineResponse};
pub use config::ElasticsearchConfig;
pub use documents::DocumentStore;
pub use dsl::{BoolQuery, KnnQuery, Query};
pub use filter::{translate_filters, TAG_FIELD_PREFIX};
pub use index::{index_definition, IndexManager, WHOLE_VALUE_ANALYZER};
pub use memory::{normalize_index_name, ElasticsearchMemory, ElasticsearchMemoryBuilder};
pub use query::{QueryExecutor, SearchHit};
pub use record::{from_indexable_document, to_indexable_document, TEXT_FIELD_PREFIX};
