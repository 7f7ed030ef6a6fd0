use crate::keys::CourseKey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("course not found: {0}")]
    CourseNotFound(CourseKey),

    #[error("content store error: {0}")]
    Store(String),

    #[error("document error: {0}")]
    Document(String),
}
