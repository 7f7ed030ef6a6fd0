//! Read-only view of a course content tree for search indexing.
//!
//! The authoritative tree lives in an external store; this crate models the
//! slice of it the indexer needs: node identity, child ordering, start dates,
//! subtree edit times, and the opt-in [`DocumentSource`] capability that lets
//! a content type contribute a search document.

mod error;
mod keys;
mod node;
mod store;

pub use error::{ContentError, Result};
pub use keys::{CourseKey, UsageId};
pub use node::{ContentNode, DocumentSource, FieldMap, StaticDocumentSource};
pub use store::{ContentStore, Revision};
