//! Sequenced external searches.
//!
//! Every request takes a ticket from a monotonically increasing counter.
//! When a completion arrives and a newer ticket has been issued, its
//! results are discarded so a slow early search never overwrites a later
//! one. Provider failures and timeouts become an empty result plus an error
//! [`Notice`]; they never propagate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::external_catalog::{CatalogHit, CatalogProvider, ExternalCatalogError};
use crate::library::MediaKind;
use crate::metrics::{SEARCH_DURATION, SEARCH_REQUESTS, SEARCH_RESULTS};
use crate::notice::Notice;

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchRequest {
    Query { query: String, kind: MediaKind },
    Trending { kind: MediaKind },
}

impl SearchRequest {
    pub fn query(query: impl Into<String>, kind: MediaKind) -> Self {
        SearchRequest::Query {
            query: query.into().trim().to_string(),
            kind,
        }
    }

    pub fn trending(kind: MediaKind) -> Self {
        SearchRequest::Trending { kind }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            SearchRequest::Query { kind, .. } | SearchRequest::Trending { kind } => *kind,
        }
    }
}

/// Result of one sequenced search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub ticket: u64,
    pub request: SearchRequest,
    pub results: Vec<CatalogHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    /// A newer search was started before this one finished.
    #[serde(default)]
    pub stale: bool,
}

/// Issues tickets and keeps the latest published outcome.
pub struct SearchSession {
    issued: AtomicU64,
    timeout: Duration,
    latest: Mutex<Option<SearchOutcome>>,
}

impl SearchSession {
    pub fn new(timeout: Duration) -> Self {
        Self {
            issued: AtomicU64::new(0),
            timeout,
            latest: Mutex::new(None),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Take the next ticket. Tickets start at 1.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` is still the newest one issued.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }

    /// Publish `outcome` unless a newer ticket exists. Returns whether it
    /// was published.
    pub fn complete(&self, outcome: &SearchOutcome) -> bool {
        let mut latest = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Checked under the lock so two completions cannot interleave.
        if !self.is_current(outcome.ticket) {
            debug!(ticket = outcome.ticket, "Discarding stale search completion");
            return false;
        }
        *latest = Some(outcome.clone());
        true
    }

    /// Most recently published outcome.
    pub fn latest(&self) -> Option<SearchOutcome> {
        match self.latest.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Run `request` against `provider` with the session timeout.
    pub async fn run(&self, provider: &dyn CatalogProvider, request: SearchRequest) -> SearchOutcome {
        let ticket = self.begin();
        let name = provider.name();
        let started = Instant::now();

        let call = async {
            match &request {
                SearchRequest::Query { query, kind } => provider.search(query, *kind).await,
                SearchRequest::Trending { kind } => provider.trending(*kind).await,
            }
        };
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ExternalCatalogError::Timeout(self.timeout.as_secs())),
        };

        SEARCH_DURATION
            .with_label_values(&[name])
            .observe(started.elapsed().as_secs_f64());

        let (results, notice, label) = match result {
            Ok(hits) => {
                SEARCH_RESULTS.with_label_values(&[]).observe(hits.len() as f64);
                let notice = hits
                    .is_empty()
                    .then(|| Notice::info("No results found"));
                (hits, notice, "success")
            }
            Err(ExternalCatalogError::Timeout(secs)) => {
                warn!(provider = name, ticket, "Search timed out after {}s", secs);
                (
                    Vec::new(),
                    Some(Notice::error("The search took too long. Try again.")),
                    "timeout",
                )
            }
            Err(e) => {
                warn!(provider = name, ticket, error = %e, "Search failed");
                (
                    Vec::new(),
                    Some(Notice::error(format!("Search failed: {}", e))),
                    "error",
                )
            }
        };

        let mut outcome = SearchOutcome {
            ticket,
            request,
            results,
            notice,
            stale: false,
        };
        if !self.complete(&outcome) {
            outcome.stale = true;
            SEARCH_REQUESTS.with_label_values(&[name, "stale"]).inc();
        } else {
            SEARCH_REQUESTS.with_label_values(&[name, label]).inc();
        }
        outcome
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}
