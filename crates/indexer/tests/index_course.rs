//! End-to-end passes over the in-memory backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courseware_content_tree::{
    ContentError, ContentNode, ContentStore, CourseKey, FieldMap, Revision,
};
use courseware_indexer::{CoursewareIndexer, EventSink, DOCUMENT_TYPE, INDEX_NAME};
use courseware_search_engine::{EngineRegistry, InMemorySearchEngine};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), json!(v)))
        .collect()
}

fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

struct FixtureStore {
    course: Mutex<ContentNode>,
    calls: AtomicUsize,
    last_revision: Mutex<Option<Revision>>,
}

impl FixtureStore {
    fn new(course: ContentNode) -> Arc<Self> {
        Arc::new(Self {
            course: Mutex::new(course),
            calls: AtomicUsize::new(0),
            last_revision: Mutex::new(None),
        })
    }

    fn replace_course(&self, course: ContentNode) {
        *self.course.lock().unwrap() = course;
    }
}

#[async_trait]
impl ContentStore for FixtureStore {
    async fn get_course(
        &self,
        _course_key: &CourseKey,
        revision: Revision,
    ) -> courseware_content_tree::Result<ContentNode> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_revision.lock().unwrap() = Some(revision);
        Ok(self.course.lock().unwrap().clone())
    }
}

struct UnreachableStore;

#[async_trait]
impl ContentStore for UnreachableStore {
    async fn get_course(
        &self,
        course_key: &CourseKey,
        _revision: Revision,
    ) -> courseware_content_tree::Result<ContentNode> {
        Err(ContentError::CourseNotFound(course_key.clone()))
    }
}

#[derive(Default)]
struct CapturingSink {
    events: Mutex<Vec<(String, Value)>>,
}

impl EventSink for CapturingSink {
    fn emit(&self, event_name: &str, payload: Value) {
        self.events
            .lock()
            .unwrap()
            .push((event_name.to_string(), payload));
    }
}

struct Harness {
    engine: Arc<InMemorySearchEngine>,
    store: Arc<FixtureStore>,
    sink: Arc<CapturingSink>,
    indexer: CoursewareIndexer,
}

fn harness(course: ContentNode) -> Harness {
    init_logging();
    let engine = InMemorySearchEngine::shared();
    let registry = EngineRegistry::new();
    registry.register(INDEX_NAME, engine.clone());

    let store = FixtureStore::new(course);
    let sink = Arc::new(CapturingSink::default());
    let indexer = CoursewareIndexer::new(store.clone(), registry)
        .with_event_sink(sink.clone());
    Harness {
        engine,
        store,
        sink,
        indexer,
    }
}

fn course_key() -> CourseKey {
    CourseKey::new("course-101")
}

#[tokio::test]
async fn first_pass_indexes_one_child() {
    let course = ContentNode::new("course-root")
        .with_child(ContentNode::new("unit-1").with_fields(fields(&[("title", "x")])));
    let h = harness(course);

    let stats = h.indexer.reindex_course(&course_key(), None).await.unwrap();

    assert_eq!(stats.indexed_count, 1);
    assert_eq!(stats.visited, 1);
    assert_eq!(stats.removed, 0);

    let doc = h.engine.document(DOCUMENT_TYPE, "unit-1").unwrap();
    assert_eq!(doc.get("course"), Some(&json!("course-101")));
    assert_eq!(doc.get("title"), Some(&json!("x")));
    assert_eq!(doc.get("start_date"), None);
}

#[tokio::test]
async fn course_start_date_is_inherited_by_documents() {
    let course = ContentNode::new("course-root")
        .with_start(ts(1000))
        .with_child(ContentNode::new("unit-1").with_fields(fields(&[("title", "x")])));
    let h = harness(course);

    h.indexer.reindex_course(&course_key(), None).await.unwrap();

    let doc = h.engine.document(DOCUMENT_TYPE, "unit-1").unwrap();
    assert_eq!(doc.get("start_date"), Some(&json!(ts(1000).to_rfc3339())));
}

#[tokio::test]
async fn fresh_edit_is_reindexed_on_a_triggered_pass() {
    let course = ContentNode::new("course-root").with_child(
        ContentNode::new("unit-1")
            .with_subtree_edited_on(ts(0))
            .with_fields(fields(&[("title", "x")])),
    );
    let h = harness(course);

    // 30s since the edit, under the 60s threshold.
    let stats = h
        .indexer
        .index_course(&course_key(), Some(ts(30)), true)
        .await
        .unwrap();

    assert_eq!(stats.indexed_count, 1);
    assert_eq!(stats.skipped, 0);
}

#[tokio::test]
async fn stale_subtree_is_skipped_and_its_document_survives() {
    let course = ContentNode::new("course-root").with_child(
        ContentNode::new("unit-1")
            .with_subtree_edited_on(ts(0))
            .with_fields(fields(&[("title", "x")])),
    );
    let h = harness(course);

    h.indexer.reindex_course(&course_key(), None).await.unwrap();
    // 90s since the edit, over the 60s threshold.
    let stats = h
        .indexer
        .index_course(&course_key(), Some(ts(90)), true)
        .await
        .unwrap();

    assert_eq!(stats.indexed_count, 0);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.removed, 0);
    assert!(h.engine.document(DOCUMENT_TYPE, "unit-1").is_some());
}

#[tokio::test]
async fn removed_node_is_purged_on_the_next_pass() {
    let course = ContentNode::new("course-root")
        .with_child(ContentNode::new("unit-1").with_fields(fields(&[("title", "x")])))
        .with_child(ContentNode::new("unit-2").with_fields(fields(&[("title", "y")])));
    let h = harness(course);

    h.indexer.reindex_course(&course_key(), None).await.unwrap();
    assert_eq!(h.engine.len(DOCUMENT_TYPE), 2);

    h.store.replace_course(
        ContentNode::new("course-root")
            .with_child(ContentNode::new("unit-1").with_fields(fields(&[("title", "x")]))),
    );
    let stats = h.indexer.reindex_course(&course_key(), None).await.unwrap();

    assert_eq!(stats.removed, 1);
    assert!(h.engine.document(DOCUMENT_TYPE, "unit-1").is_some());
    assert!(h.engine.document(DOCUMENT_TYPE, "unit-2").is_none());
}

#[tokio::test]
async fn node_failure_surfaces_only_after_the_full_pass() {
    use courseware_content_tree::DocumentSource;

    struct BrokenSource;
    impl DocumentSource for BrokenSource {
        fn index_dictionary(&self) -> courseware_content_tree::Result<FieldMap> {
            Err(ContentError::Document("render failed".into()))
        }
    }

    let course = ContentNode::new("course-root")
        .with_child(ContentNode::new("unit-bad").with_source(Arc::new(BrokenSource)))
        .with_child(ContentNode::new("unit-good").with_fields(fields(&[("title", "y")])));
    let h = harness(course);

    let err = h
        .indexer
        .reindex_course(&course_key(), None)
        .await
        .unwrap_err();

    assert_eq!(err.errors.len(), 1);
    assert_eq!(err.errors[0].usage_id, Some("unit-bad".into()));
    // Siblings were still processed before the aggregated error was raised.
    assert!(h.engine.document(DOCUMENT_TYPE, "unit-good").is_some());
    // No event on a failed reindex.
    assert!(h.sink.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn errors_are_returned_in_stats_when_not_raising() {
    init_logging();
    let registry = EngineRegistry::new();
    registry.register(INDEX_NAME, InMemorySearchEngine::shared());
    let indexer = CoursewareIndexer::new(Arc::new(UnreachableStore), registry);

    let stats = indexer
        .index_course(&course_key(), None, false)
        .await
        .unwrap();

    assert_eq!(stats.errors.len(), 1);
    assert_eq!(stats.errors[0].message, "general indexing error occurred");
    assert_eq!(stats.indexed_count, 0);
}

#[tokio::test]
async fn store_failure_raises_one_generic_record() {
    init_logging();
    let registry = EngineRegistry::new();
    registry.register(INDEX_NAME, InMemorySearchEngine::shared());
    let indexer = CoursewareIndexer::new(Arc::new(UnreachableStore), registry);

    let err = indexer
        .reindex_course(&course_key(), None)
        .await
        .unwrap_err();

    assert_eq!(err.errors.len(), 1);
    assert_eq!(err.errors[0].usage_id, None);
}

#[tokio::test]
async fn missing_engine_is_a_silent_no_op() {
    let course = ContentNode::new("course-root")
        .with_child(ContentNode::new("unit-1").with_fields(fields(&[("title", "x")])));
    init_logging();
    let store = FixtureStore::new(course);
    let indexer = CoursewareIndexer::new(store.clone(), EngineRegistry::new());

    let stats = indexer
        .index_course(&course_key(), None, true)
        .await
        .unwrap();

    assert_eq!(stats.indexed_count, 0);
    assert!(stats.errors.is_empty());
    // The tree is never fetched when no engine is configured.
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn passes_read_the_published_revision() {
    let course = ContentNode::new("course-root");
    let h = harness(course);

    h.indexer.reindex_course(&course_key(), None).await.unwrap();

    assert_eq!(
        *h.store.last_revision.lock().unwrap(),
        Some(Revision::PublishedOnly)
    );
}

#[tokio::test]
async fn successful_reindex_emits_a_completion_event() {
    let course = ContentNode::new("course-root")
        .with_child(ContentNode::new("unit-1").with_fields(fields(&[("title", "x")])));
    let h = harness(course);

    h.indexer.reindex_course(&course_key(), None).await.unwrap();

    let events = h.sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    let (name, payload) = &events[0];
    assert_eq!(name, "courseware.course.index.reindexed");
    assert_eq!(
        payload,
        &json!({"indexed_count": 1, "category": "courseware_index"})
    );
}
