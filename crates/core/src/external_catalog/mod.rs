//! External catalog integration for Google Books and TMDB.
//!
//! Provider responses are converted to [`CatalogHit`] inside each client;
//! provider JSON never leaves this module.

mod genres;
mod google_books;
mod tmdb;
mod types;

pub use genres::map_genre;
pub use google_books::{GoogleBooksClient, GoogleBooksConfig};
pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::library::MediaKind;

/// Errors that can occur when interacting with external catalogs.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),

    /// The provider does not carry this kind of media.
    #[error("Provider does not support {0} searches")]
    UnsupportedKind(MediaKind),

    /// The provider did not answer in time.
    #[error("Search timed out after {0}s")]
    Timeout(u64),
}

/// A source of catalog search results.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Short provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Search by free text within one media kind.
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogHit>, ExternalCatalogError>;

    /// Default listing shown before the user searches.
    async fn trending(&self, kind: MediaKind) -> Result<Vec<CatalogHit>, ExternalCatalogError>;
}

/// Dispatches books to Google Books and movies/series to TMDB.
pub struct CombinedProvider {
    google_books: Option<GoogleBooksClient>,
    tmdb: Option<TmdbClient>,
}

impl CombinedProvider {
    /// Create a new combined provider with optional backends.
    pub fn new(google_books: Option<GoogleBooksClient>, tmdb: Option<TmdbClient>) -> Self {
        Self { google_books, tmdb }
    }

    /// Build the clients named in `config`. Missing sections stay disabled.
    pub fn from_config(config: &Config) -> Result<Self, ExternalCatalogError> {
        let google_books = config
            .providers
            .google_books
            .clone()
            .map(|c| GoogleBooksClient::new(c, config.search.books_trending_query.clone()))
            .transpose()?;
        let tmdb = config
            .providers
            .tmdb
            .clone()
            .map(TmdbClient::new)
            .transpose()?;

        info!(
            google_books = google_books.is_some(),
            tmdb = tmdb.is_some(),
            "External catalog providers configured"
        );
        Ok(Self::new(google_books, tmdb))
    }

    pub fn has_google_books(&self) -> bool {
        self.google_books.is_some()
    }

    pub fn has_tmdb(&self) -> bool {
        self.tmdb.is_some()
    }

    fn backend(&self, kind: MediaKind) -> Result<&dyn CatalogProvider, ExternalCatalogError> {
        let backend: Option<&dyn CatalogProvider> = match kind {
            MediaKind::Book => self
                .google_books
                .as_ref()
                .map(|c| c as &dyn CatalogProvider),
            MediaKind::Movie | MediaKind::Series => {
                self.tmdb.as_ref().map(|c| c as &dyn CatalogProvider)
            }
        };
        backend.ok_or_else(|| {
            ExternalCatalogError::NotConfigured(format!("no provider configured for {}", kind))
        })
    }
}

#[async_trait]
impl CatalogProvider for CombinedProvider {
    fn name(&self) -> &'static str {
        "combined"
    }

    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        self.backend(kind)?.search(query, kind).await
    }

    async fn trending(&self, kind: MediaKind) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        self.backend(kind)?.trending(kind).await
    }
}
