use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use opto_catalog_core::content::model::{Career, CareerInput, Catalog, LinkRequest};
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
        .route("/v1/careers", get(fetch_all).put(bulk_upsert))
        .route("/v1/careers/{content_id}", delete(remove))
        .route("/v1/careers/link", post(link))
}

/// All active postings, newest published first, unpublished drafts last.
async fn fetch_all(State(state): State<AppState>) -> ApiResult<Json<Catalog<Career>>> {
    let rows = state.store().fetch_careers().await?;
    Ok(Json(aggregate::partition_careers(rows)))
}

async fn bulk_upsert(
    State(state): State<AppState>,
    editor: RequireEditor,
    Json(body): Json<Catalog<CareerInput>>,
) -> ApiResult<Json<Catalog<Career>>> {
    let mut saved = Catalog::default();
    for (language, input) in body.iter() {
        validate::validate_career_input(input)?;
        let stored = state
            .store()
            .upsert_career(
                normalize::career_to_storage(input, language),
                input.clear_published_at,
            )
            .await?;
        notify(
            &state,
            CatalogEvent::Upserted(RecordUpserted {
                kind: ContentKind::Career,
                content_id: stored.content_id.clone(),
                language,
                timestamp: Utc::now(),
            }),
        );
        saved.push(language, normalize::career_to_client(&stored));
    }
    tracing::info!(editor = %editor.claims.sub, count = saved.len(), "saved careers");
    Ok(Json(saved))
}

async fn remove(
    State(state): State<AppState>,
    editor: RequireEditor,
    Path(content_id): Path<String>,
) -> ApiResult<StatusCode> {
    let rows = state.store().delete_careers(&content_id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound(format!("no career '{content_id}'")));
    }
    notify(
        &state,
        CatalogEvent::Deleted(RecordDeleted {
            kind: ContentKind::Career,
            content_id: content_id.clone(),
            rows,
            timestamp: Utc::now(),
        }),
    );
    tracing::info!(editor = %editor.claims.sub, %content_id, rows, "deleted career");
    Ok(StatusCode::NO_CONTENT)
}

async fn link(
    State(state): State<AppState>,
    editor: RequireEditor,
    Json(request): Json<LinkRequest>,
) -> ApiResult<Json<Career>> {
    let row = state.store().link_careers(&request).await?;
    notify(
        &state,
        CatalogEvent::Linked(RecordLinked {
            kind: ContentKind::Career,
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
        "linked career translation"
    );
    Ok(Json(normalize::career_to_client(&row)))
}
