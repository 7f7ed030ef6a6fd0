//! # Courseware Indexer
//!
//! Incremental search-index synchronization for course content trees.
//!
//! ## Pipeline
//!
//! ```text
//! Course tree (published view)
//!     │
//!     ├──> Tree Walker (depth-first)
//!     │      ├─> documents pushed to the search engine
//!     │      └─> indexed-id set
//!     │
//!     └──> Reconciler
//!            └─> orphaned index entries removed
//! ```
//!
//! Per-node failures never abort a pass; they accumulate into
//! [`ErrorRecord`]s and surface as one aggregated [`SearchIndexingError`]
//! when the caller asks for errors to be raised.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use courseware_content_tree::CourseKey;
//! use courseware_indexer::CoursewareIndexer;
//! use courseware_search_engine::registry;
//!
//! # async fn run(store: Arc<dyn courseware_content_tree::ContentStore>) -> anyhow::Result<()> {
//! let indexer = CoursewareIndexer::new(store, registry().clone());
//! let stats = indexer.reindex_course(&CourseKey::new("course-101"), None).await?;
//!
//! println!("indexed {} documents", stats.indexed_count);
//! # Ok(())
//! # }
//! ```

mod error;
mod events;
mod indexer;
mod reconciler;
mod stats;
mod walker;

pub use error::{ErrorRecord, Result, SearchIndexingError};
pub use events::{EventSink, LogEventSink, NullEventSink, EVENT_CATEGORY, REINDEXED_EVENT};
pub use indexer::{
    CoursewareIndexer, IndexerConfig, DOCUMENT_TYPE, INDEX_NAME, STALENESS_THRESHOLD_SECS,
};
pub use reconciler::Reconciler;
pub use stats::IndexStats;
pub use walker::{TreeWalker, WalkOutcome};
