//! Search backend interface for courseware indexing.
//!
//! Backends implement [`SearchEngine`] and register under an index name in an
//! [`EngineRegistry`]; hosts resolve an engine by name at the start of each
//! indexing pass. [`InMemorySearchEngine`] is a complete reference backend
//! used by the indexer's tests and usable as a fixture.

mod document;
mod engine;
mod error;
mod memory;
mod registry;

pub use document::{Document, FieldMap};
pub use engine::{SearchEngine, SearchHit, SearchResponse};
pub use error::{Result, SearchError};
pub use memory::InMemorySearchEngine;
pub use registry::{registry, EngineRegistry};
