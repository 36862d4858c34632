//! Domain Entities
//!
//! Objects with identity that persist over time.

mod memory_record;

pub use memory_record::*;
