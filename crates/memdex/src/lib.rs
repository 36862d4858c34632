//! Memdex Domain Library
//!
//! Core domain types and interfaces for storing memory records in a
//! document/vector search engine.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure data model and error taxonomy
//!   - `entities/`: `MemoryRecord`
//!   - `value_objects/`: Immutable value types (`PayloadValue`, `MemoryFilter`)
//!   - `errors/`: `MemoryError`, the single error kind every backend reports
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: `MemoryDb`, the storage capability backends implement
//!   - `services/`: `EmbeddingGenerator`, the text-to-vector collaborator
//!
//! Backends (e.g. `memdex-elasticsearch`) live in separate crates.
//!
//! # Usage
//!
//! ```rust,ignore
//! use memdex::{MemoryDb, MemoryFilter, MemoryRecord};
//!
//! let record = MemoryRecord::new("r1")
//!     .with_vector(vec![0.1, 0.2, 0.3, 0.4])
//!     .with_tag("color", "red")
//!     .with_payload("text", "a red thing");
//! db.upsert("notes", &record).await?;
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    MemoryError, MemoryFilter, MemoryRecord, PayloadValue, DEFAULT_LIMIT,
    RESERVED_DOCUMENT_ID_TAG,
};
pub use ports::{EmbeddingGenerator, MemoryDb, RecordStream, ScoredRecordStream};
