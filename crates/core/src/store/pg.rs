//! PostgreSQL record store.
//!
//! Uniqueness among active rows comes from the partial unique indexes on
//! `(content_id, language) WHERE is_active` (see the migrations). The link
//! operation is a single conditional UPDATE so two concurrent links can
//! never both succeed; the loser surfaces as `Conflict` via the index, or
//! as `NotFound` if the winner already moved the target.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use crate::content::model::{CareerRow, FaqRow, LinkRequest, ProductRow};
use crate::error::CatalogError;

use super::RecordStore;

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_in<T>(&self, table: &str) -> Result<Vec<T>, CatalogError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let rows = sqlx::query_as::<_, T>(&format!(
            "SELECT * FROM {table} WHERE is_active ORDER BY content_id, language"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn deactivate_in(&self, table: &str, content_id: &str) -> Result<u64, CatalogError> {
        let result = sqlx::query(&format!(
            "UPDATE {table} SET is_active = FALSE, updated_at = now() \
             WHERE content_id = $1 AND is_active"
        ))
        .bind(content_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn link_in<T>(&self, table: &str, link: &LinkRequest) -> Result<T, CatalogError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let source_exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {table} WHERE content_id = $1 AND is_active)"
        ))
        .bind(&link.source_content_id)
        .fetch_one(&self.pool)
        .await?;
        if !source_exists {
            return Err(CatalogError::not_found(format!(
                "no active record '{}' to link against",
                link.source_content_id
            )));
        }

        // Atomic check-then-write: the partial unique index rejects the
        // update if another active row already holds the destination key.
        let updated = sqlx::query(&format!(
            "UPDATE {table} SET content_id = $1, updated_at = now() \
             WHERE content_id = $2 AND language = $3 AND is_active"
        ))
        .bind(&link.source_content_id)
        .bind(&link.target_content_id)
        .bind(link.target_language)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                CatalogError::conflict(format!(
                    "'{}' already exists in language '{}'",
                    link.source_content_id, link.target_language
                ))
            } else {
                CatalogError::Database(err)
            }
        })?;

        if updated.rows_affected() == 0 {
            return Err(CatalogError::not_found(format!(
                "no active record '{}' in language '{}'",
                link.target_content_id, link.target_language
            )));
        }

        tracing::debug!(
            table,
            source = %link.source_content_id,
            target = %link.target_content_id,
            language = %link.target_language,
            "relinked record"
        );

        let row = sqlx::query_as::<_, T>(&format!(
            "SELECT * FROM {table} WHERE content_id = $1 AND language = $2 AND is_active"
        ))
        .bind(&link.source_content_id)
        .bind(link.target_language)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn ping(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|err| CatalogError::Unavailable(err.to_string()))?;
        Ok(())
    }

    async fn fetch_products(&self) -> Result<Vec<ProductRow>, CatalogError> {
        self.fetch_in("products").await
    }

    async fn upsert_product(&self, row: ProductRow) -> Result<ProductRow, CatalogError> {
        let saved = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (content_id, language, name, category, description, \
                                   specs, features, applications, downloads, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (content_id, language) WHERE is_active DO UPDATE SET \
                 name = EXCLUDED.name, \
                 category = EXCLUDED.category, \
                 description = EXCLUDED.description, \
                 specs = EXCLUDED.specs, \
                 features = EXCLUDED.features, \
                 applications = EXCLUDED.applications, \
                 downloads = EXCLUDED.downloads, \
                 image_url = EXCLUDED.image_url, \
                 updated_at = now() \
             RETURNING *",
        )
        .bind(&row.content_id)
        .bind(row.language)
        .bind(&row.name)
        .bind(&row.category)
        .bind(&row.description)
        .bind(&row.specs)
        .bind(&row.features)
        .bind(&row.applications)
        .bind(&row.downloads)
        .bind(&row.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn delete_products(&self, content_id: &str) -> Result<u64, CatalogError> {
        self.deactivate_in("products", content_id).await
    }

    async fn link_products(&self, link: &LinkRequest) -> Result<ProductRow, CatalogError> {
        self.link_in("products", link).await
    }

    async fn fetch_careers(&self) -> Result<Vec<CareerRow>, CatalogError> {
        self.fetch_in("careers").await
    }

    async fn upsert_career(
        &self,
        row: CareerRow,
        clear_published_at: bool,
    ) -> Result<CareerRow, CatalogError> {
        let saved = sqlx::query_as::<_, CareerRow>(
            "INSERT INTO careers (content_id, language, title, location, employment_type, \
                                  description, requirements, is_published, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, \
                     CASE WHEN $8 AND NOT $9 THEN now() END) \
             ON CONFLICT (content_id, language) WHERE is_active DO UPDATE SET \
                 title = EXCLUDED.title, \
                 location = EXCLUDED.location, \
                 employment_type = EXCLUDED.employment_type, \
                 description = EXCLUDED.description, \
                 requirements = EXCLUDED.requirements, \
                 is_published = EXCLUDED.is_published, \
                 published_at = CASE \
                     WHEN $9 THEN NULL \
                     WHEN $8 AND careers.published_at IS NULL THEN now() \
                     ELSE careers.published_at \
                 END, \
                 updated_at = now() \
             RETURNING *",
        )
        .bind(&row.content_id)
        .bind(row.language)
        .bind(&row.title)
        .bind(&row.location)
        .bind(&row.employment_type)
        .bind(&row.description)
        .bind(&row.requirements)
        .bind(row.is_published)
        .bind(clear_published_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn delete_careers(&self, content_id: &str) -> Result<u64, CatalogError> {
        self.deactivate_in("careers", content_id).await
    }

    async fn link_careers(&self, link: &LinkRequest) -> Result<CareerRow, CatalogError> {
        self.link_in("careers", link).await
    }

    async fn fetch_faqs(&self) -> Result<Vec<FaqRow>, CatalogError> {
        self.fetch_in("faqs").await
    }

    async fn upsert_faq(&self, row: FaqRow) -> Result<FaqRow, CatalogError> {
        let saved = sqlx::query_as::<_, FaqRow>(
            "INSERT INTO faqs (content_id, language, question, answer, category, order_index) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (content_id, language) WHERE is_active DO UPDATE SET \
                 question = EXCLUDED.question, \
                 answer = EXCLUDED.answer, \
                 category = EXCLUDED.category, \
                 order_index = EXCLUDED.order_index, \
                 updated_at = now() \
             RETURNING *",
        )
        .bind(&row.content_id)
        .bind(row.language)
        .bind(&row.question)
        .bind(&row.answer)
        .bind(&row.category)
        .bind(row.order_index)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn delete_faqs(&self, content_id: &str) -> Result<u64, CatalogError> {
        self.deactivate_in("faqs", content_id).await
    }

    async fn link_faqs(&self, link: &LinkRequest) -> Result<FaqRow, CatalogError> {
        self.link_in("faqs", link).await
    }
}
