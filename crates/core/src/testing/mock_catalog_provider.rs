//! Mock catalog provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::external_catalog::{CatalogHit, CatalogProvider, ExternalCatalogError};
use crate::library::MediaKind;

/// A recorded provider call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogQuery {
    Search { query: String, kind: MediaKind },
    Trending { kind: MediaKind },
}

/// Mock implementation of the CatalogProvider trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable hits per media kind
/// - Track queries for assertions
/// - Simulate failures and slow responses
///
/// # Example
///
/// ```rust,ignore
/// use myshelf_core::testing::{MockCatalogProvider, fixtures};
///
/// let provider = MockCatalogProvider::new();
/// provider.set_results(MediaKind::Movie, vec![fixtures::movie_hit("603", "The Matrix")]).await;
///
/// let hits = provider.search("matrix", MediaKind::Movie).await?;
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockCatalogProvider {
    /// Hits by media kind.
    hits: Arc<RwLock<HashMap<MediaKind, Vec<CatalogHit>>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
    /// Artificial latency applied to every call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockCatalogProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogProvider {
    /// Create a new empty mock provider.
    pub fn new() -> Self {
        Self {
            hits: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Result Configuration
    // =========================================================================

    /// Replace the hits returned for `kind`.
    pub async fn set_results(&self, kind: MediaKind, hits: Vec<CatalogHit>) {
        self.hits.write().await.insert(kind, hits);
    }

    /// Clear all hits.
    pub async fn clear_results(&self) {
        self.hits.write().await.clear();
    }

    /// Delay every call by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Sleep if configured, then take the next error if set.
    async fn prepare(&self, query: RecordedCatalogQuery) -> Result<(), ExternalCatalogError> {
        self.queries.write().await.push(query);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogProvider for MockCatalogProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        self.prepare(RecordedCatalogQuery::Search {
            query: query.to_string(),
            kind,
        })
        .await?;

        let query_lower = query.to_lowercase();
        let hits = self.hits.read().await;
        Ok(hits
            .get(&kind)
            .map(|hits| {
                hits.iter()
                    .filter(|h| h.title.to_lowercase().contains(&query_lower))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn trending(&self, kind: MediaKind) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        self.prepare(RecordedCatalogQuery::Trending { kind }).await?;
        Ok(self
            .hits
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }
}
