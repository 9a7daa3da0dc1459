use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use opto_catalog_core::content::model::{Catalog, LinkRequest, Product, ProductInput};
use opto_catalog_core::content::{aggregate, normalize, validate};
use opto_catalog_core::events::types::{
    CatalogEvent, ContentKind, RecordDeleted, RecordLinked, RecordUpserted,
};

use crate::auth::RequireEditor;
use crate::error::{ApiError, ApiResult};
use crate::routes::notify;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(fetch_all).put(bulk_upsert))
        .route("/v1/products/{content_id}", delete(remove))
        .route("/v1/products/link", post(link))
}

/// Public aggregated catalog: all active products, partitioned by
/// language, categories canonicalized.
async fn fetch_all(State(state): State<AppState>) -> ApiResult<Json<Catalog<Product>>> {
    let rows = state.store().fetch_products().await?;
    Ok(Json(aggregate::partition_products(rows)))
}

/// Bulk upsert. The body carries the full records to persist per
/// language; each row is overwritten whole, never patched.
async fn bulk_upsert(
    State(state): State<AppState>,
    editor: RequireEditor,
    Json(body): Json<Catalog<ProductInput>>,
) -> ApiResult<Json<Catalog<Product>>> {
    let mut saved = Catalog::default();
    for (language, input) in body.iter() {
        validate::validate_product_input(input)?;
        let stored = state
            .store()
            .upsert_product(normalize::product_to_storage(input, language))
            .await?;
        notify(
            &state,
            CatalogEvent::Upserted(RecordUpserted {
                kind: ContentKind::Product,
                content_id: stored.content_id.clone(),
                language,
                timestamp: Utc::now(),
            }),
        );
        saved.push(
            language,
            normalize::canonicalize_product(normalize::product_to_client(&stored)),
        );
    }
    tracing::info!(editor = %editor.claims.sub, count = saved.len(), "saved products");
    Ok(Json(saved))
}

/// Remove a product in every language it exists in.
async fn remove(
    State(state): State<AppState>,
    editor: RequireEditor,
    Path(content_id): Path<String>,
) -> ApiResult<StatusCode> {
    let rows = state.store().delete_products(&content_id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound(format!("no product '{content_id}'")));
    }
    notify(
        &state,
        CatalogEvent::Deleted(RecordDeleted {
            kind: ContentKind::Product,
            content_id: content_id.clone(),
            rows,
            timestamp: Utc::now(),
        }),
    );
    tracing::info!(editor = %editor.claims.sub, %content_id, rows, "deleted product");
    Ok(StatusCode::NO_CONTENT)
}

/// Re-key the target-language record so both languages share one
/// content id.
async fn link(
    State(state): State<AppState>,
    editor: RequireEditor,
    Json(request): Json<LinkRequest>,
) -> ApiResult<Json<Product>> {
    let row = state.store().link_products(&request).await?;
    notify(
        &state,
        CatalogEvent::Linked(RecordLinked {
            kind: ContentKind::Product,
            source_content_id: request.source_content_id.clone(),
            target_content_id: request.target_content_id.clone(),
            target_language: request.target_language,
            timestamp: Utc::now(),
        }),
    );
    tracing::info!(
        editor = %editor.claims.sub,
        source = %request.source_content_id,
        target = %request.target_content_id,
        language = %request.target_language,
        "linked product translation"
    );
    Ok(Json(normalize::canonicalize_product(
        normalize::product_to_client(&row),
    )))
}
