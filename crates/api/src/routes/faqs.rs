use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use opto_catalog_core::content::model::{Catalog, Faq, FaqGroup, FaqInput, LinkRequest};
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
        .route("/v1/faqs", get(fetch_all).put(bulk_upsert))
        .route("/v1/faqs/{content_id}", delete(remove))
        .route("/v1/faqs/link", post(link))
}

/// Active FAQs partitioned by language, grouped by category, questions
/// in order-index order.
async fn fetch_all(State(state): State<AppState>) -> ApiResult<Json<Catalog<FaqGroup>>> {
    let rows = state.store().fetch_faqs().await?;
    Ok(Json(aggregate::group_faqs(rows)))
}

async fn bulk_upsert(
    State(state): State<AppState>,
    editor: RequireEditor,
    Json(body): Json<Catalog<FaqInput>>,
) -> ApiResult<Json<Catalog<Faq>>> {
    let mut saved = Catalog::default();
    for (language, input) in body.iter() {
        validate::validate_faq_input(input)?;
        let stored = state
            .store()
            .upsert_faq(normalize::faq_to_storage(input, language))
            .await?;
        notify(
            &state,
            CatalogEvent::Upserted(RecordUpserted {
                kind: ContentKind::Faq,
                content_id: stored.content_id.clone(),
                language,
                timestamp: Utc::now(),
            }),
        );
        saved.push(language, normalize::faq_to_client(&stored));
    }
    tracing::info!(editor = %editor.claims.sub, count = saved.len(), "saved faqs");
    Ok(Json(saved))
}

async fn remove(
    State(state): State<AppState>,
    editor: RequireEditor,
    Path(content_id): Path<String>,
) -> ApiResult<StatusCode> {
    let rows = state.store().delete_faqs(&content_id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound(format!("no faq '{content_id}'")));
    }
    notify(
        &state,
        CatalogEvent::Deleted(RecordDeleted {
            kind: ContentKind::Faq,
            content_id: content_id.clone(),
            rows,
            timestamp: Utc::now(),
        }),
    );
    tracing::info!(editor = %editor.claims.sub, %content_id, rows, "deleted faq");
    Ok(StatusCode::NO_CONTENT)
}

async fn link(
    State(state): State<AppState>,
    editor: RequireEditor,
    Json(request): Json<LinkRequest>,
) -> ApiResult<Json<Faq>> {
    let row = state.store().link_faqs(&request).await?;
    notify(
        &state,
        CatalogEvent::Linked(RecordLinked {
            kind: ContentKind::Faq,
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
        "linked faq translation"
    );
    Ok(Json(normalize::faq_to_client(&row)))
}
