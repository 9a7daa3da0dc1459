use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::language::Language;

/// Which catalog a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Product,
    Career,
    Faq,
}

/// Events emitted after successful write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CatalogEvent {
    Upserted(RecordUpserted),
    Deleted(RecordDeleted),
    Linked(RecordLinked),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpserted {
    pub kind: ContentKind,
    pub content_id: String,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDeleted {
    pub kind: ContentKind,
    pub content_id: String,
    /// How many language rows the delete touched.
    pub rows: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordLinked {
    pub kind: ContentKind,
    pub source_content_id: String,
    pub target_content_id: String,
    pub target_language: Language,
    pub timestamp: DateTime<Utc>,
}
