pub mod careers;
pub mod faqs;
pub mod health;
pub mod products;

use axum::Router;
use opto_catalog_core::events::types::CatalogEvent;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(products::routes())
        .merge(careers::routes())
        .merge(faqs::routes())
        .with_state(state)
}

/// Best-effort mutation notification; no subscribers is not a failure.
pub(crate) fn notify(state: &AppState, event: CatalogEvent) {
    let _ = state.event_bus().publish(event);
}
