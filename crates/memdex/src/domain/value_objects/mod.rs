//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod memory_filter;
mod payload_value;

pub use memory_filter::*;
pub use payload_value::*;
