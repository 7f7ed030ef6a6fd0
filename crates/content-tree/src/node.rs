use crate::error::Result;
use crate::keys::UsageId;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Field name/value mapping a node contributes to its search document.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Capability a content type implements to contribute a search document.
///
/// Nodes without a source are simply non-indexable. A source may return an
/// empty map, in which case the node is visited but contributes no document.
pub trait DocumentSource: Send + Sync {
    fn index_dictionary(&self) -> Result<FieldMap>;
}

/// Source backed by a prebuilt field map.
pub struct StaticDocumentSource {
    fields: FieldMap,
}

impl StaticDocumentSource {
    #[must_use]
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }
}

impl DocumentSource for StaticDocumentSource {
    fn index_dictionary(&self) -> Result<FieldMap> {
        Ok(self.fields.clone())
    }
}

/// One unit in the course tree.
///
/// Children are owned for traversal purposes only; the authoritative tree
/// lives in the external store behind [`crate::ContentStore`].
#[derive(Clone)]
pub struct ContentNode {
    usage_id: UsageId,
    start: Option<DateTime<Utc>>,
    subtree_edited_on: Option<DateTime<Utc>>,
    source: Option<Arc<dyn DocumentSource>>,
    children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(usage_id: impl Into<UsageId>) -> Self {
        Self {
            usage_id: usage_id.into(),
            start: None,
            subtree_edited_on: None,
            source: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_subtree_edited_on(mut self, edited_on: DateTime<Utc>) -> Self {
        self.subtree_edited_on = Some(edited_on);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Shorthand for attaching a [`StaticDocumentSource`].
    #[must_use]
    pub fn with_fields(self, fields: FieldMap) -> Self {
        self.with_source(Arc::new(StaticDocumentSource::new(fields)))
    }

    #[must_use]
    pub fn with_child(mut self, child: ContentNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: ContentNode) {
        self.children.push(child);
    }

    #[must_use]
    pub fn usage_id(&self) -> &UsageId {
        &self.usage_id
    }

    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    #[must_use]
    pub fn subtree_edited_on(&self) -> Option<DateTime<Utc>> {
        self.subtree_edited_on
    }

    #[must_use]
    pub fn children(&self) -> &[ContentNode] {
        &self.children
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    #[must_use]
    pub fn is_indexable(&self) -> bool {
        self.source.is_some()
    }

    /// Fields this node contributes to its search document, or `None` when
    /// the node is not indexable.
    pub fn index_dictionary(&self) -> Option<Result<FieldMap>> {
        self.source.as_ref().map(|source| source.index_dictionary())
    }
}

impl fmt::Debug for ContentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentNode")
            .field("usage_id", &self.usage_id)
            .field("start", &self.start)
            .field("subtree_edited_on", &self.subtree_edited_on)
            .field("indexable", &self.is_indexable())
            .field("children", &self.children.len())
            .finish()
    }
}
