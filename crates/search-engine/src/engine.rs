use crate::document::{Document, FieldMap};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// One document returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub data: FieldMap,
}

impl SearchHit {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.data.get("id").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

/// Operations a search backend exposes to the indexer.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Insert or overwrite `document` under its `id` within `doc_type`.
    async fn index(&self, doc_type: &str, document: &Document) -> Result<()>;

    /// Documents of `doc_type` matching every `field_filter` entry whose id
    /// is not in `exclude_ids`.
    async fn search(
        &self,
        doc_type: &str,
        field_filter: &FieldMap,
        exclude_ids: &HashSet<String>,
    ) -> Result<SearchResponse>;

    /// Delete the document with `id` from `doc_type`.
    async fn remove(&self, doc_type: &str, id: &str) -> Result<()>;
}
