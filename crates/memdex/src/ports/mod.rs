//! Ports (Interfaces)
//!
//! Abstract interfaces that define how callers interact with a memory
//! backend and how a backend reaches the embedding service.
//!
//! Implementations of these traits live in backend crates.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
