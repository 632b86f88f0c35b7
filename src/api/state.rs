use std::sync::Arc;

use tokio::sync::RwLock;

use crate::library::persist::Storage;
use crate::library::Library;
use crate::services::providers::{Catalog, StreamResolver};
use crate::services::recommend::RecommendationEngine;

/// Shared application state.
///
/// The library sits behind one process-wide lock; handlers snapshot what
/// they need before calling out to providers so the lock is never held
/// across an await on external I/O.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<RwLock<Library>>,
    pub catalog: Arc<dyn Catalog>,
    pub resolver: Arc<dyn StreamResolver>,
    pub engine: Arc<RecommendationEngine>,
    storage: Arc<Storage>,
}

impl AppState {
    /// Builds state around the given providers, restoring the library from
    /// the storage directory
    pub fn new(
        catalog: Arc<dyn Catalog>,
        resolver: Arc<dyn StreamResolver>,
        storage: Storage,
    ) -> Self {
        let library = storage.load();
        let engine = Arc::new(RecommendationEngine::new(catalog.clone()));
        Self {
            library: Arc::new(RwLock::new(library)),
            catalog,
            resolver,
            engine,
            storage: Arc::new(storage),
        }
    }

    /// Persists a snapshot of the library.
    ///
    /// Failures are logged and swallowed: a disk problem must not abort the
    /// in-memory operation that triggered the save.
    pub async fn save_library(&self) {
        let snapshot = self.library.read().await.clone();
        if let Err(e) = self.storage.save(&snapshot).await {
            tracing::error!(error = %e, "Failed to persist library state");
        }
    }
}
