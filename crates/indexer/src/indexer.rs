use crate::error::{ErrorRecord, Result, SearchIndexingError};
use crate::events::{EventSink, LogEventSink, EVENT_CATEGORY, REINDEXED_EVENT};
use crate::reconciler::Reconciler;
use crate::stats::IndexStats;
use crate::walker::TreeWalker;
use chrono::{DateTime, Duration, Utc};
use courseware_content_tree::{ContentStore, CourseKey, Revision};
use courseware_search_engine::EngineRegistry;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Index the courseware documents live in.
pub const INDEX_NAME: &str = "courseware_index";

/// Document type for indexed course content.
pub const DOCUMENT_TYPE: &str = "courseware_content";

/// Age beyond which a triggered pass skips re-indexing a subtree.
pub const STALENESS_THRESHOLD_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub index_name: String,
    pub document_type: String,
    pub staleness_threshold: Duration,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            index_name: INDEX_NAME.to_string(),
            document_type: DOCUMENT_TYPE.to_string(),
            staleness_threshold: Duration::seconds(STALENESS_THRESHOLD_SECS),
        }
    }
}

/// Orchestrates one walk-then-reconcile pass per course.
///
/// Indexing is a best-effort subsystem: an unconfigured engine is a silent
/// no-op, and a pass always runs to completion, surfacing at most one
/// aggregated error.
pub struct CoursewareIndexer {
    store: Arc<dyn ContentStore>,
    engines: EngineRegistry,
    events: Arc<dyn EventSink>,
    config: IndexerConfig,
}

impl CoursewareIndexer {
    pub fn new(store: Arc<dyn ContentStore>, engines: EngineRegistry) -> Self {
        Self {
            store,
            engines,
            events: Arc::new(LogEventSink),
            config: IndexerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: IndexerConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one indexing pass over `course_key`.
    ///
    /// With `triggered_at` set, subtrees whose last edit is older than the
    /// staleness threshold are skipped. With `raise_on_error`, accumulated
    /// failures surface as one [`SearchIndexingError`] after the pass
    /// completes; otherwise they are returned in the stats.
    pub async fn index_course(
        &self,
        course_key: &CourseKey,
        triggered_at: Option<DateTime<Utc>>,
        raise_on_error: bool,
    ) -> Result<IndexStats> {
        let started = Instant::now();
        let mut stats = IndexStats::new();

        let Some(engine) = self.engines.get(&self.config.index_name) else {
            log::debug!(
                "no search engine for {}; skipping index pass for {course_key}",
                self.config.index_name
            );
            return Ok(stats);
        };

        let mut errors = Vec::new();
        match self
            .store
            .get_course(course_key, Revision::PublishedOnly)
            .await
        {
            Ok(course) => {
                let walker = TreeWalker::new(
                    engine.as_ref(),
                    course_key,
                    &self.config.document_type,
                    self.config.staleness_threshold,
                    triggered_at,
                );
                let outcome = walker.walk(course.children(), course.start()).await;
                stats.indexed_count = outcome.pushed;
                stats.visited = outcome.indexed_ids.len() as u64;
                stats.skipped = outcome.skipped;
                errors.extend(outcome.errors);

                let reconciler = Reconciler::new(engine.as_ref(), &self.config.document_type);
                let (removed, reconcile_errors) =
                    reconciler.reconcile(course_key, &outcome.indexed_ids).await;
                stats.removed = removed;
                errors.extend(reconcile_errors);
            }
            Err(err) => {
                log::error!(
                    "indexing error encountered, courseware index may be out of date {course_key}: {err}"
                );
                errors.push(ErrorRecord::new("general indexing error occurred"));
            }
        }

        stats.time_ms = (started.elapsed().as_millis() as u64).max(1);
        log::info!(
            "indexed course {course_key}: {} pushed, {} skipped, {} removed, {} error(s)",
            stats.indexed_count,
            stats.skipped,
            stats.removed,
            errors.len()
        );

        if raise_on_error && !errors.is_empty() {
            return Err(SearchIndexingError::new(errors));
        }
        stats.errors = errors;
        Ok(stats)
    }

    /// (Re)index all content within the given course, raising on error and
    /// emitting a completion event on success.
    pub async fn reindex_course(
        &self,
        course_key: &CourseKey,
        triggered_at: Option<DateTime<Utc>>,
    ) -> Result<IndexStats> {
        let stats = self.index_course(course_key, triggered_at, true).await?;
        self.track_index_request(REINDEXED_EVENT, stats.indexed_count, None);
        Ok(stats)
    }

    fn track_index_request(&self, event_name: &str, indexed_count: u64, location: Option<&str>) {
        let mut payload = json!({
            "indexed_count": indexed_count,
            "category": EVENT_CATEGORY,
        });
        if let Some(location) = location {
            payload["location_id"] = json!(location);
        }
        self.events.emit(event_name, payload);
    }
}
