//! Repository Ports
//!
//! Abstract interfaces for memory persistence operations.

mod memory_db;

pub use memory_db::*;
