//! Google Books volumes API client.
//!
//! Works without an API key at low volume. There is no trending endpoint, so
//! `trending` runs a configured default query instead.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CatalogHit, CatalogProvider, ExternalCatalogError, GenreHints};
use crate::library::MediaKind;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const MAX_RESULTS: &str = "20";

/// Google Books client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleBooksConfig {
    /// Optional API key for higher quotas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL (default: https://www.googleapis.com/books/v1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Restrict results to a language, e.g. "pt".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_restrict: Option<String>,
}

/// Google Books API client.
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    lang_restrict: Option<String>,
    trending_query: String,
}

impl GoogleBooksClient {
    pub fn new(
        config: GoogleBooksConfig,
        trending_query: impl Into<String>,
    ) -> Result<Self, ExternalCatalogError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
            lang_restrict: config.lang_restrict.filter(|l| !l.trim().is_empty()),
            trending_query: trending_query.into(),
        })
    }

    /// Search volumes by free-text query.
    pub async fn search_volumes(&self, query: &str) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        let url = format!("{}/volumes", self.base_url);

        debug!("Google Books search: query='{}'", query);

        let mut request = self
            .client
            .get(&url)
            .query(&[("q", query), ("maxResults", MAX_RESULTS)]);
        if let Some(lang) = &self.lang_restrict {
            request = request.query(&[("langRestrict", lang.as_str())]);
        }
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?;

        let status = response.status();
        if status == 429 {
            return Err(ExternalCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let volumes: VolumesResponse = response.json().await.map_err(|e| {
            ExternalCatalogError::ParseError(format!("Failed to parse volumes response: {}", e))
        })?;

        Ok(volumes.items.into_iter().map(CatalogHit::from).collect())
    }
}

#[async_trait]
impl CatalogProvider for GoogleBooksClient {
    fn name(&self) -> &'static str {
        "google_books"
    }

    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        match kind {
            MediaKind::Book => self.search_volumes(query).await,
            other => Err(ExternalCatalogError::UnsupportedKind(other)),
        }
    }

    async fn trending(&self, kind: MediaKind) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        match kind {
            MediaKind::Book => self.search_volumes(&self.trending_query).await,
            other => Err(ExternalCatalogError::UnsupportedKind(other)),
        }
    }
}

// ============================================================================
// Google Books API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    id: String,
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    description: Option<String>,
    image_links: Option<ImageLinks>,
    published_date: Option<String>,
    average_rating: Option<f32>,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

/// Thumbnails come back as `http:` URLs; browsers block them as mixed
/// content.
fn force_https(url: String) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{}", rest),
        None => url,
    }
}

impl From<Volume> for CatalogHit {
    fn from(v: Volume) -> Self {
        let info = v.volume_info;
        let image = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .map(force_https);

        Self {
            external_id: v.id,
            kind: MediaKind::Book,
            title: info.title,
            description: info.description,
            image,
            release_date: info.published_date,
            rating: info.average_rating,
            genre_hints: GenreHints::Categories(info.categories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_conversion() {
        let response: VolumesResponse = serde_json::from_str(
            r#"{"kind":"books#volumes","totalItems":1,"items":[{
                "id": "zyTCAlFPjgYC",
                "volumeInfo": {
                    "title": "The Google Story",
                    "description": "An inside look",
                    "publishedDate": "2005-11-15",
                    "averageRating": 3.5,
                    "categories": ["Business & Economics"],
                    "imageLinks": {
                        "smallThumbnail": "http://books.google.com/small",
                        "thumbnail": "http://books.google.com/thumb"
                    }
                }
            }]}"#,
        )
        .unwrap();

        let hit: CatalogHit = response.items.into_iter().next().unwrap().into();
        assert_eq!(hit.external_id, "zyTCAlFPjgYC");
        assert_eq!(hit.kind, MediaKind::Book);
        assert_eq!(hit.image.as_deref(), Some("https://books.google.com/thumb"));
        assert_eq!(hit.release_date.as_deref(), Some("2005-11-15"));
        assert_eq!(
            hit.genre_hints,
            GenreHints::Categories(vec!["Business & Economics".to_string()])
        );
    }

    #[test]
    fn test_empty_response_has_no_items() {
        let response: VolumesResponse =
            serde_json::from_str(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_force_https() {
        assert_eq!(force_https("http://x/y".to_string()), "https://x/y");
        assert_eq!(force_https("https://x/y".to_string()), "https://x/y");
    }

    #[tokio::test]
    async fn test_movies_are_unsupported() {
        let client =
            GoogleBooksClient::new(GoogleBooksConfig::default(), "subject:fiction").unwrap();
        let err = client.trending(MediaKind::Movie).await.unwrap_err();
        assert!(matches!(
            err,
            ExternalCatalogError::UnsupportedKind(MediaKind::Movie)
        ));
    }
}
