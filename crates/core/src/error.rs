use thiserror::Error;

use crate::content::validate::ValidationError;

/// Failure taxonomy of the consistency layer.
///
/// There is no transient-failure classification in this domain, so nothing
/// here is ever retried automatically. Write failures must reach the caller
/// verbatim; a swallowed write would silently desynchronize the two
/// language variants of a record.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A referenced `content_id`/`language` pair is absent (or inactive).
    #[error("not found: {0}")]
    NotFound(String),

    /// A unique-key collision, e.g. a link destination already occupied.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The record store is unreachable. Reads may degrade to the bundled
    /// snapshot; writes surface this directly.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    pub fn not_found(what: impl Into<String>) -> Self {
        CatalogError::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        CatalogError::Conflict(what.into())
    }
}
