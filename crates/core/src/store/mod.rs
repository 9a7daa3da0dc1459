//! The record store port.
//!
//! The store is the sole owner of persisted rows. Everything above it
//! operates on data already materialized for the duration of one request.
//! Implementations must enforce `(content_id, language)` uniqueness among
//! active rows at the storage layer — the link operation relies on that
//! constraint instead of an application-level check-then-write.

pub mod memory;
pub mod pg;

use async_trait::async_trait;

use crate::content::model::{CareerRow, FaqRow, LinkRequest, ProductRow};
use crate::error::CatalogError;

pub use memory::MemoryRecordStore;
pub use pg::PgRecordStore;

/// Persistence contract, one operation set per content type.
///
/// `fetch_*` returns every active row in both languages. `upsert_*`
/// overwrites the full payload keyed by `(content_id, language)` — never a
/// partial merge. `delete_*` soft-deletes every language row sharing the
/// content id and returns how many rows it touched. `link_*` re-keys the
/// target-language row to the source content id; it fails `NotFound` when
/// either endpoint is missing and `Conflict` when the destination key is
/// held by a different row.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), CatalogError>;

    async fn fetch_products(&self) -> Result<Vec<ProductRow>, CatalogError>;
    async fn upsert_product(&self, row: ProductRow) -> Result<ProductRow, CatalogError>;
    async fn delete_products(&self, content_id: &str) -> Result<u64, CatalogError>;
    async fn link_products(&self, link: &LinkRequest) -> Result<ProductRow, CatalogError>;

    async fn fetch_careers(&self) -> Result<Vec<CareerRow>, CatalogError>;
    /// `clear_published_at` is the editor's explicit request to null the
    /// publish timestamp; it is never cleared implicitly. The timestamp is
    /// set by the store on the first unpublished→published transition.
    async fn upsert_career(
        &self,
        row: CareerRow,
        clear_published_at: bool,
    ) -> Result<CareerRow, CatalogError>;
    async fn delete_careers(&self, content_id: &str) -> Result<u64, CatalogError>;
    async fn link_careers(&self, link: &LinkRequest) -> Result<CareerRow, CatalogError>;

    async fn fetch_faqs(&self) -> Result<Vec<FaqRow>, CatalogError>;
    async fn upsert_faq(&self, row: FaqRow) -> Result<FaqRow, CatalogError>;
    async fn delete_faqs(&self, content_id: &str) -> Result<u64, CatalogError>;
    async fn link_faqs(&self, link: &LinkRequest) -> Result<FaqRow, CatalogError>;
}
