use serde_json::Value;

/// Event emitted after a successful reindex pass.
pub const REINDEXED_EVENT: &str = "courseware.course.index.reindexed";

/// Fixed category tag carried by index events.
pub const EVENT_CATEGORY: &str = "courseware_index";

/// Destination for index completion events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event_name: &str, payload: Value);
}

/// Sink that forwards events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&self, event_name: &str, payload: Value) {
        log::info!("event {event_name}: {payload}");
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event_name: &str, _payload: Value) {}
}
