use crate::document::{Document, FieldMap};
use crate::engine::{SearchEngine, SearchHit, SearchResponse};
use crate::error::{Result, SearchError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory reference backend.
///
/// Documents are keyed by document type, then by id. Search results are
/// returned in id order so callers can assert on them.
#[derive(Default)]
pub struct InMemorySearchEngine {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl InMemorySearchEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of documents held under `doc_type`.
    #[must_use]
    pub fn len(&self, doc_type: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(doc_type)
            .map_or(0, HashMap::len)
    }

    #[must_use]
    pub fn is_empty(&self, doc_type: &str) -> bool {
        self.len(doc_type) == 0
    }

    /// Copy of the stored document, if present.
    #[must_use]
    pub fn document(&self, doc_type: &str, id: &str) -> Option<Document> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(doc_type)
            .and_then(|collection| collection.get(id))
            .cloned()
    }
}

#[async_trait]
impl SearchEngine for InMemorySearchEngine {
    async fn index(&self, doc_type: &str, document: &Document) -> Result<()> {
        let id = document
            .id()
            .ok_or_else(|| SearchError::InvalidDocument("document has no id field".into()))?
            .to_string();

        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(doc_type.to_string())
            .or_default()
            .insert(id, document.clone());
        Ok(())
    }

    async fn search(
        &self,
        doc_type: &str,
        field_filter: &FieldMap,
        exclude_ids: &HashSet<String>,
    ) -> Result<SearchResponse> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut matched: Vec<(&String, &Document)> = collections
            .get(doc_type)
            .into_iter()
            .flatten()
            .filter(|(id, document)| {
                !exclude_ids.contains(id.as_str()) && document.matches(field_filter)
            })
            .collect();
        matched.sort_by(|(a, _), (b, _)| a.cmp(b));

        let results = matched
            .into_iter()
            .map(|(_, document)| SearchHit {
                data: document.fields().clone(),
            })
            .collect();
        Ok(SearchResponse { results })
    }

    async fn remove(&self, doc_type: &str, id: &str) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let removed = collections
            .get_mut(doc_type)
            .and_then(|collection| collection.remove(id));
        if removed.is_none() {
            return Err(SearchError::Backend(format!(
                "no document {id} in {doc_type}"
            )));
        }
        Ok(())
    }
}
