use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::broadcast;

use myshelf_core::{
    CatalogProvider, Config, EventBus, SanitizedConfig, SearchSession, Shelf, ShelfEvent,
};

/// Shared application state
pub struct AppState {
    config: Config,
    /// Never held across an `.await`.
    shelf: Mutex<Shelf>,
    catalog: Option<Arc<dyn CatalogProvider>>,
    search: SearchSession,
    events: EventBus,
}

impl AppState {
    pub fn new(config: Config, shelf: Shelf, catalog: Option<Arc<dyn CatalogProvider>>) -> Self {
        let events = EventBus::default();
        let search = SearchSession::new(Duration::from_secs(u64::from(
            config.search.timeout_secs,
        )));

        Self {
            config,
            shelf: Mutex::new(shelf.with_events(events.clone())),
            catalog,
            search,
            events,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// Lock the session. A poisoned lock is recovered since every shelf
    /// mutation commits atomically.
    pub fn shelf(&self) -> MutexGuard<'_, Shelf> {
        match self.shelf.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn catalog(&self) -> Option<&dyn CatalogProvider> {
        self.catalog.as_deref()
    }

    pub fn search_session(&self) -> &SearchSession {
        &self.search
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShelfEvent> {
        self.events.subscribe()
    }
}
