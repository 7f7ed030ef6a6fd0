use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name/value mapping.
pub type FieldMap = serde_json::Map<String, Value>;

/// One search document: the field mapping sent to the engine for one node.
///
/// A well-formed courseware document always carries `course` and `id`;
/// re-indexing with the same `id` within one document type overwrites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: FieldMap,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Merge `fields` in, overwriting existing keys.
    pub fn merge(&mut self, fields: FieldMap) {
        self.fields.extend(fields);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// True when every entry of `filter` is present with an equal value.
    #[must_use]
    pub fn matches(&self, filter: &FieldMap) -> bool {
        filter
            .iter()
            .all(|(key, value)| self.fields.get(key) == Some(value))
    }
}

impl From<FieldMap> for Document {
    fn from(fields: FieldMap) -> Self {
        Self { fields }
    }
}
