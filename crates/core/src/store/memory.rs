//! In-memory record store.
//!
//! Backs handler tests and embedded use without a live database. A single
//! mutex serializes every operation, which makes the link operation's
//! check-then-write atomic in-process — the same guarantee the partial
//! unique index gives the Postgres store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::content::language::Language;
use crate::content::model::{CareerRow, FaqRow, LinkRequest, ProductRow};
use crate::error::CatalogError;

use super::RecordStore;

#[derive(Default)]
struct Tables {
    products: Vec<ProductRow>,
    careers: Vec<CareerRow>,
    faqs: Vec<FaqRow>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tables<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut guard = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

/// Common key/lifecycle accessors so link and delete are written once.
trait KeyedRow: Clone {
    fn content_id(&self) -> &str;
    fn language(&self) -> Language;
    fn is_active(&self) -> bool;
    fn deactivate(&mut self, now: DateTime<Utc>);
    fn rekey(&mut self, content_id: String, now: DateTime<Utc>);
}

macro_rules! impl_keyed_row {
    ($row:ty) => {
        impl KeyedRow for $row {
            fn content_id(&self) -> &str {
                &self.content_id
            }
            fn language(&self) -> Language {
                self.language
            }
            fn is_active(&self) -> bool {
                self.is_active
            }
            fn deactivate(&mut self, now: DateTime<Utc>) {
                self.is_active = false;
                self.updated_at = now;
            }
            fn rekey(&mut self, content_id: String, now: DateTime<Utc>) {
                self.content_id = content_id;
                self.updated_at = now;
            }
        }
    };
}

impl_keyed_row!(ProductRow);
impl_keyed_row!(CareerRow);
impl_keyed_row!(FaqRow);

fn fetch_active<R: KeyedRow>(rows: &[R]) -> Vec<R> {
    let mut active: Vec<R> = rows.iter().filter(|r| r.is_active()).cloned().collect();
    active.sort_by(|a, b| {
        a.content_id()
            .cmp(b.content_id())
            .then_with(|| a.language().cmp(&b.language()))
    });
    active
}

fn deactivate_all<R: KeyedRow>(rows: &mut [R], content_id: &str) -> u64 {
    let now = Utc::now();
    let mut touched = 0;
    for row in rows
        .iter_mut()
        .filter(|r| r.is_active() && r.content_id() == content_id)
    {
        row.deactivate(now);
        touched += 1;
    }
    touched
}

fn link_rows<R: KeyedRow>(rows: &mut [R], link: &LinkRequest) -> Result<R, CatalogError> {
    if !rows
        .iter()
        .any(|r| r.is_active() && r.content_id() == link.source_content_id)
    {
        return Err(CatalogError::not_found(format!(
            "no active record '{}' to link against",
            link.source_content_id
        )));
    }

    let target_idx = rows
        .iter()
        .position(|r| {
            r.is_active()
                && r.content_id() == link.target_content_id
                && r.language() == link.target_language
        })
        .ok_or_else(|| {
            CatalogError::not_found(format!(
                "no active record '{}' in language '{}'",
                link.target_content_id, link.target_language
            ))
        })?;

    let destination_held = rows.iter().enumerate().any(|(idx, r)| {
        idx != target_idx
            && r.is_active()
            && r.content_id() == link.source_content_id
            && r.language() == link.target_language
    });
    if destination_held {
        return Err(CatalogError::conflict(format!(
            "'{}' already exists in language '{}'",
            link.source_content_id, link.target_language
        )));
    }

    rows[target_idx].rekey(link.source_content_id.clone(), Utc::now());
    Ok(rows[target_idx].clone())
}

fn upsert_product_row(rows: &mut Vec<ProductRow>, mut row: ProductRow) -> ProductRow {
    let now = Utc::now();
    row.is_active = true;
    if let Some(existing) = rows
        .iter_mut()
        .find(|r| r.is_active && r.content_id == row.content_id && r.language == row.language)
    {
        row.id = existing.id;
        row.created_at = existing.created_at;
        row.updated_at = now;
        *existing = row.clone();
    } else {
        row.id = Uuid::new_v4();
        row.created_at = now;
        row.updated_at = now;
        rows.push(row.clone());
    }
    row
}

fn upsert_career_row(rows: &mut Vec<CareerRow>, mut row: CareerRow, clear: bool) -> CareerRow {
    let now = Utc::now();
    row.is_active = true;
    if let Some(existing) = rows
        .iter_mut()
        .find(|r| r.is_active && r.content_id == row.content_id && r.language == row.language)
    {
        row.id = existing.id;
        row.created_at = existing.created_at;
        row.updated_at = now;
        row.published_at = if clear {
            None
        } else if row.is_published && existing.published_at.is_none() {
            Some(now)
        } else {
            existing.published_at
        };
        *existing = row.clone();
    } else {
        row.id = Uuid::new_v4();
        row.created_at = now;
        row.updated_at = now;
        row.published_at = if row.is_published && !clear {
            Some(now)
        } else {
            None
        };
        rows.push(row.clone());
    }
    row
}

fn upsert_faq_row(rows: &mut Vec<FaqRow>, mut row: FaqRow) -> FaqRow {
    let now = Utc::now();
    row.is_active = true;
    if let Some(existing) = rows
        .iter_mut()
        .find(|r| r.is_active && r.content_id == row.content_id && r.language == row.language)
    {
        row.id = existing.id;
        row.created_at = existing.created_at;
        row.updated_at = now;
        *existing = row.clone();
    } else {
        row.id = Uuid::new_v4();
        row.created_at = now;
        row.updated_at = now;
        rows.push(row.clone());
    }
    row
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn ping(&self) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn fetch_products(&self) -> Result<Vec<ProductRow>, CatalogError> {
        Ok(self.with_tables(|t| fetch_active(&t.products)))
    }

    async fn upsert_product(&self, row: ProductRow) -> Result<ProductRow, CatalogError> {
        Ok(self.with_tables(|t| upsert_product_row(&mut t.products, row)))
    }

    async fn delete_products(&self, content_id: &str) -> Result<u64, CatalogError> {
        Ok(self.with_tables(|t| deactivate_all(&mut t.products, content_id)))
    }

    async fn link_products(&self, link: &LinkRequest) -> Result<ProductRow, CatalogError> {
        self.with_tables(|t| link_rows(&mut t.products, link))
    }

    async fn fetch_careers(&self) -> Result<Vec<CareerRow>, CatalogError> {
        Ok(self.with_tables(|t| fetch_active(&t.careers)))
    }

    async fn upsert_career(
        &self,
        row: CareerRow,
        clear_published_at: bool,
    ) -> Result<CareerRow, CatalogError> {
        Ok(self.with_tables(|t| upsert_career_row(&mut t.careers, row, clear_published_at)))
    }

    async fn delete_careers(&self, content_id: &str) -> Result<u64, CatalogError> {
        Ok(self.with_tables(|t| deactivate_all(&mut t.careers, content_id)))
    }

    async fn link_careers(&self, link: &LinkRequest) -> Result<CareerRow, CatalogError> {
        self.with_tables(|t| link_rows(&mut t.careers, link))
    }

    async fn fetch_faqs(&self) -> Result<Vec<FaqRow>, CatalogError> {
        Ok(self.with_tables(|t| fetch_active(&t.faqs)))
    }

    async fn upsert_faq(&self, row: FaqRow) -> Result<FaqRow, CatalogError> {
        Ok(self.with_tables(|t| upsert_faq_row(&mut t.faqs, row)))
    }

    async fn delete_faqs(&self, content_id: &str) -> Result<u64, CatalogError> {
        Ok(self.with_tables(|t| deactivate_all(&mut t.faqs, content_id)))
    }

    async fn link_faqs(&self, link: &LinkRequest) -> Result<FaqRow, CatalogError> {
        self.with_tables(|t| link_rows(&mut t.faqs, link))
    }
}
