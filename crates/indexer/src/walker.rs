use crate::error::ErrorRecord;
use chrono::{DateTime, Duration, Utc};
use courseware_content_tree::{ContentNode, CourseKey};
use courseware_search_engine::{Document, SearchEngine};
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

/// Accumulators produced by one walk.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Ids of every visited candidate node, including staleness-skipped
    /// ones. This is the exclusion set for orphan deletion.
    pub indexed_ids: HashSet<String>,
    /// Documents successfully pushed.
    pub pushed: u64,
    /// Indexable nodes suppressed by the staleness skip.
    pub skipped: u64,
    /// Node-level failures, in encounter order.
    pub errors: Vec<ErrorRecord>,
}

/// Depth-first walk over one course tree, pushing documents as it goes.
///
/// Constructed fresh per pass; owns the per-pass accumulators so recursion
/// needs no shared mutable state beyond `&mut self`.
pub struct TreeWalker<'a> {
    engine: &'a dyn SearchEngine,
    course_key: &'a CourseKey,
    document_type: &'a str,
    staleness_threshold: Duration,
    triggered_at: Option<DateTime<Utc>>,
    outcome: WalkOutcome,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        engine: &'a dyn SearchEngine,
        course_key: &'a CourseKey,
        document_type: &'a str,
        staleness_threshold: Duration,
        triggered_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            engine,
            course_key,
            document_type,
            staleness_threshold,
            triggered_at,
            outcome: WalkOutcome::default(),
        }
    }

    /// Walk the root's children, threading the course-level start date down.
    pub async fn walk(
        mut self,
        root_children: &[ContentNode],
        root_start: Option<DateTime<Utc>>,
    ) -> WalkOutcome {
        for child in root_children {
            self.visit(child, root_start, false).await;
        }
        self.outcome
    }

    fn visit<'b>(
        &'b mut self,
        node: &'b ContentNode,
        inherited_start: Option<DateTime<Utc>>,
        inherited_skip: bool,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'b>> {
        Box::pin(async move {
            // Neither content nor descendants: nothing to index below here.
            if !node.is_indexable() && !node.has_children() {
                return;
            }

            let id = node.usage_id().to_string();
            // The id must be recorded before the skip decision, or a
            // stale-but-valid node would be deleted by reconciliation.
            self.outcome.indexed_ids.insert(id.clone());

            // A node is not searchable before its own or any ancestor's
            // start date, whichever is latest.
            let effective_start = inherited_start.max(node.start());

            let skip = inherited_skip || self.subtree_unchanged(node);

            for child in node.children() {
                self.visit(child, effective_start, skip).await;
            }

            if skip {
                if node.is_indexable() {
                    self.outcome.skipped += 1;
                }
                return;
            }

            if let Err(record) = self.push_document(node, &id, effective_start).await {
                log::warn!("could not index item {id}: {record}");
                self.outcome.errors.push(record);
            }
        })
    }

    /// True when the whole subtree was last edited long enough before the
    /// triggering instant that re-indexing it can be skipped. Relies on
    /// `subtree_edited_on` being updated transitively for every descendant
    /// change; nodes without an edit time never originate a skip.
    fn subtree_unchanged(&self, node: &ContentNode) -> bool {
        match (self.triggered_at, node.subtree_edited_on()) {
            (Some(triggered_at), Some(edited_on)) => {
                triggered_at.signed_duration_since(edited_on) > self.staleness_threshold
            }
            _ => false,
        }
    }

    async fn push_document(
        &mut self,
        node: &ContentNode,
        id: &str,
        effective_start: Option<DateTime<Utc>>,
    ) -> Result<(), ErrorRecord> {
        let Some(dictionary) = node.index_dictionary() else {
            return Ok(());
        };
        let dictionary = dictionary.map_err(|err| {
            ErrorRecord::for_node(
                node.usage_id().clone(),
                format!("could not build document: {err}"),
            )
        })?;
        if dictionary.is_empty() {
            return Ok(());
        }

        let mut document = Document::new();
        document.insert("course", self.course_key.to_string());
        document.merge(dictionary);
        document.insert("id", id);
        if let Some(start) = effective_start {
            document.insert("start_date", Value::String(start.to_rfc3339()));
        }

        self.engine
            .index(self.document_type, &document)
            .await
            .map_err(|err| {
                ErrorRecord::for_node(
                    node.usage_id().clone(),
                    format!("could not index item: {err}"),
                )
            })?;
        self.outcome.pushed += 1;
        Ok(())
    }
}
