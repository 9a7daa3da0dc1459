use std::sync::Arc;

use opto_catalog_core::events::bus::EventBus;
use opto_catalog_core::store::RecordStore;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State`
/// extractor. The record store is held behind the trait so tests and the
/// binary can inject different implementations.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn RecordStore>,
    config: AppConfig,
    event_bus: EventBus,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: AppConfig, event_bus: EventBus) -> Self {
        Self {
            inner: Arc::new(InnerState {
                store,
                config,
                event_bus,
            }),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }
}
