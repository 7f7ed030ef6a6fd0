use crate::error::Result;
use crate::keys::CourseKey;
use crate::node::ContentNode;
use async_trait::async_trait;

/// Which revision of the tree a store should materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    /// Only published content; the view an indexing pass works from.
    PublishedOnly,
    /// Everything, drafts included.
    All,
}

/// Read-only access to the authoritative course tree.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Materialize the course rooted at `course_key`, children included.
    async fn get_course(&self, course_key: &CourseKey, revision: Revision) -> Result<ContentNode>;
}
