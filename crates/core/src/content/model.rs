//! Storage rows, client shapes, and editor submission shapes.
//!
//! Each content type exists in three forms: the flat snake_case row the
//! store persists, the camelCase shape the site consumes, and the input
//! shape an editor submits (the client shape minus server-assigned
//! fields). Conversions live in [`super::normalize`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::language::Language;

/// One side of a bilingual response, partitioned by language. A missing
/// partition on the wire is an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Catalog<T> {
    #[serde(default)]
    pub de: Vec<T>,
    #[serde(default)]
    pub en: Vec<T>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Catalog {
            de: Vec::new(),
            en: Vec::new(),
        }
    }
}

impl<T> Catalog<T> {
    pub fn push(&mut self, language: Language, item: T) {
        match language {
            Language::De => self.de.push(item),
            Language::En => self.en.push(item),
        }
    }

    pub fn len(&self) -> usize {
        self.de.len() + self.en.len()
    }

    pub fn is_empty(&self) -> bool {
        self.de.is_empty() && self.en.is_empty()
    }

    /// Iterate both partitions with their language.
    pub fn iter(&self) -> impl Iterator<Item = (Language, &T)> {
        self.de
            .iter()
            .map(|item| (Language::De, item))
            .chain(self.en.iter().map(|item| (Language::En, item)))
    }
}

/// Re-key request making two records translations of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    pub source_content_id: String,
    pub target_content_id: String,
    pub target_language: Language,
}

/// Reference to a downloadable asset. The URL is an opaque string issued
/// by the object-storage collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRef {
    pub label: String,
    pub url: String,
}

// --- Products ---------------------------------------------------------

/// Database row of the `products` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub content_id: String,
    pub language: Language,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Structured specs as a JSONB object.
    pub specs: Value,
    pub features: Vec<String>,
    pub applications: Vec<String>,
    /// JSONB array of [`DownloadRef`].
    pub downloads: Value,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing product. Optional storage fields are defaulted to empty
/// values, never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub content_id: String,
    pub language: Language,
    pub name: String,
    pub category: String,
    pub description: String,
    pub specs: Map<String, Value>,
    pub features: Vec<String>,
    pub applications: Vec<String>,
    pub downloads: Vec<DownloadRef>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editor submission for one product in one language. Carries the full
/// payload to persist; the store overwrites, it never merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    pub content_id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub specs: Option<Map<String, Value>>,
    pub features: Option<Vec<String>>,
    pub applications: Option<Vec<String>>,
    pub downloads: Option<Vec<DownloadRef>>,
    pub image_url: Option<String>,
}

// --- Careers ----------------------------------------------------------

/// Database row of the `careers` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CareerRow {
    pub id: Uuid,
    pub content_id: String,
    pub language: Language,
    pub title: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub is_published: bool,
    /// Set on the first unpublished→published transition, then preserved
    /// unless the editor explicitly clears it.
    pub published_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    pub content_id: String,
    pub language: Language,
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerInput {
    pub content_id: String,
    pub title: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub is_published: bool,
    /// Explicit request to null out `published_at`; it is never cleared
    /// automatically.
    pub clear_published_at: bool,
}

// --- FAQs -------------------------------------------------------------

/// Database row of the `faqs` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FaqRow {
    pub id: Uuid,
    pub content_id: String,
    pub language: Language,
    pub question: String,
    pub answer: String,
    /// Grouping key; compared case-sensitively, exact match.
    pub category: String,
    /// Sort key within a category. Neither contiguous nor unique.
    pub order_index: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub content_id: String,
    pub language: Language,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaqInput {
    pub content_id: String,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub order_index: Option<i32>,
}

/// One FAQ category with its questions, already sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqGroup {
    pub category: String,
    pub questions: Vec<Faq>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_push_partitions_by_language() {
        let mut catalog = Catalog::default();
        catalog.push(Language::De, "a");
        catalog.push(Language::En, "b");
        catalog.push(Language::De, "c");
        assert_eq!(catalog.de, vec!["a", "c"]);
        assert_eq!(catalog.en, vec!["b"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn link_request_uses_camel_case_wire_names() {
        let link: LinkRequest = serde_json::from_str(
            r#"{"sourceContentId":"a","targetContentId":"b","targetLanguage":"en"}"#,
        )
        .unwrap();
        assert_eq!(link.source_content_id, "a");
        assert_eq!(link.target_language, Language::En);
    }

    #[test]
    fn product_input_defaults_missing_fields() {
        let input: ProductInput =
            serde_json::from_str(r#"{"contentId":"mvpulse-2","name":"MVpulse 2"}"#).unwrap();
        assert_eq!(input.content_id, "mvpulse-2");
        assert!(input.category.is_none());
        assert!(input.downloads.is_none());
    }
}
