use crate::error::ErrorRecord;
use courseware_content_tree::CourseKey;
use courseware_search_engine::{FieldMap, SearchEngine};
use serde_json::json;
use std::collections::HashSet;

/// Removes index entries for nodes no longer present in the current walk.
pub struct Reconciler<'a> {
    engine: &'a dyn SearchEngine,
    document_type: &'a str,
}

impl<'a> Reconciler<'a> {
    pub fn new(engine: &'a dyn SearchEngine, document_type: &'a str) -> Self {
        Self {
            engine,
            document_type,
        }
    }

    /// Delete every document of this course whose id is not in
    /// `indexed_ids`. Ids in the set are never deleted, whether or not a
    /// document was pushed for them this pass.
    ///
    /// Returns the delete count and the failures encountered; a failed
    /// query yields one generic record, a failed delete records the id and
    /// the sweep continues.
    pub async fn reconcile(
        &self,
        course_key: &CourseKey,
        indexed_ids: &HashSet<String>,
    ) -> (u64, Vec<ErrorRecord>) {
        let mut filter = FieldMap::new();
        filter.insert("course".into(), json!(course_key.to_string()));

        let response = match self
            .engine
            .search(self.document_type, &filter, indexed_ids)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                log::error!("could not query removed items for {course_key}: {err}");
                return (0, vec![ErrorRecord::new("general indexing error occurred")]);
            }
        };

        let mut removed = 0;
        let mut errors = Vec::new();
        for hit in &response.results {
            let Some(id) = hit.id() else {
                errors.push(ErrorRecord::new("search result has no id field"));
                continue;
            };
            match self.engine.remove(self.document_type, id).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    log::warn!("could not remove deleted item {id}: {err}");
                    errors.push(ErrorRecord::for_node(
                        id.into(),
                        format!("could not remove deleted item: {err}"),
                    ));
                }
            }
        }
        (removed, errors)
    }
}
