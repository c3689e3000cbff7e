//! The knowledge base consulted during resolution.

mod theory;

pub use theory::{Indexer, Theory, STORE_VAR_PREFIX};
