use std::sync::Arc;

use tracing::info;

use crate::engine::lifecycle::LifecycleManager;
use crate::error::AppError;
use crate::models::service::seed_catalog;
use crate::observability::metrics::Metrics;
use crate::storage::{LogisticsStore, MemoryStore};

pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub lifecycle: LifecycleManager<MemoryStore>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let metrics = Metrics::new();
        let lifecycle = LifecycleManager::new(store.clone(), metrics.clone());

        Self {
            store,
            lifecycle,
            metrics,
        }
    }

    /// Loads the default transport offerings into an empty catalog.
    pub fn seeded() -> Result<Self, AppError> {
        let state = Self::new();
        for spec in seed_catalog() {
            let service = state.store.insert_service(spec)?;
            info!(service_id = service.id, name = %service.name, "seeded service offering");
        }
        Ok(state)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
