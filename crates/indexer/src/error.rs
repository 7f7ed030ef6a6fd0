use courseware_content_tree::UsageId;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchIndexingError>;

/// One accumulated indexing failure.
///
/// Records are collected over a whole pass and never raised individually;
/// `usage_id` names the node at fault when the failure was node-level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    pub usage_id: Option<UsageId>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            usage_id: None,
        }
    }

    pub fn for_node(usage_id: UsageId, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            usage_id: Some(usage_id),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.usage_id {
            Some(usage_id) => write!(f, "{} ({usage_id})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Aggregated failure for one indexing pass.
///
/// Carries every [`ErrorRecord`] in the order it was accumulated.
#[derive(Error, Debug)]
#[error("error(s) present during indexing: {} error(s)", .errors.len())]
pub struct SearchIndexingError {
    pub errors: Vec<ErrorRecord>,
}

impl SearchIndexingError {
    #[must_use]
    pub fn new(errors: Vec<ErrorRecord>) -> Self {
        Self { errors }
    }
}
