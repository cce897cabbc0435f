//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CatalogHit, CatalogProvider, ExternalCatalogError, GenreHints};
use crate::library::MediaKind;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const POSTER_SIZE: &str = "w500";

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL for posters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    /// Response language, e.g. "pt-BR".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    image_base_url: String,
    language: Option<String>,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, ExternalCatalogError> {
        if config.api_key.trim().is_empty() {
            return Err(ExternalCatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.api_key,
            image_base_url: config
                .image_base_url
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            language: config.language,
        })
    }

    /// Search for movies by title.
    pub async fn search_movies(&self, query: &str) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        debug!("TMDB movie search: query='{}'", query);
        let page: TmdbPage<TmdbMovieResult> = self.fetch("search/movie", Some(query)).await?;
        Ok(self.movie_hits(page))
    }

    /// Search for TV series by name.
    pub async fn search_tv(&self, query: &str) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        debug!("TMDB TV search: query='{}'", query);
        let page: TmdbPage<TmdbTvResult> = self.fetch("search/tv", Some(query)).await?;
        Ok(self.tv_hits(page))
    }

    /// Movies trending this week.
    pub async fn trending_movies(&self) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        debug!("TMDB trending movies");
        let page: TmdbPage<TmdbMovieResult> = self.fetch("trending/movie/week", None).await?;
        Ok(self.movie_hits(page))
    }

    /// Series trending this week.
    pub async fn trending_tv(&self) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        debug!("TMDB trending TV");
        let page: TmdbPage<TmdbTvResult> = self.fetch("trending/tv/week", None).await?;
        Ok(self.tv_hits(page))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<TmdbPage<T>, ExternalCatalogError> {
        let url = format!("{}/{}", self.base_url, path);

        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())]);
        if let Some(q) = query {
            request = request.query(&[("query", q)]);
        }
        if let Some(lang) = &self.language {
            request = request.query(&[("language", lang.as_str())]);
        }

        let response = request.send().await?;

        let status = response.status();
        if status == 401 {
            return Err(ExternalCatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
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

        response.json().await.map_err(|e| {
            ExternalCatalogError::ParseError(format!("Failed to parse {} response: {}", path, e))
        })
    }

    fn poster_url(&self, poster_path: Option<String>) -> Option<String> {
        poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}{}", self.image_base_url, POSTER_SIZE, p))
    }

    fn movie_hits(&self, page: TmdbPage<TmdbMovieResult>) -> Vec<CatalogHit> {
        page.results
            .into_iter()
            .map(|r| CatalogHit {
                external_id: r.id.to_string(),
                kind: MediaKind::Movie,
                title: r.title,
                description: r.overview,
                image: self.poster_url(r.poster_path),
                release_date: r.release_date.filter(|d| !d.is_empty()),
                rating: r.vote_average,
                genre_hints: GenreHints::TmdbIds(r.genre_ids),
            })
            .collect()
    }

    fn tv_hits(&self, page: TmdbPage<TmdbTvResult>) -> Vec<CatalogHit> {
        page.results
            .into_iter()
            .map(|r| CatalogHit {
                external_id: r.id.to_string(),
                kind: MediaKind::Series,
                title: r.name,
                description: r.overview,
                image: self.poster_url(r.poster_path),
                release_date: r.first_air_date.filter(|d| !d.is_empty()),
                rating: r.vote_average,
                genre_hints: GenreHints::TmdbIds(r.genre_ids),
            })
            .collect()
    }
}

#[async_trait]
impl CatalogProvider for TmdbClient {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        match kind {
            MediaKind::Movie => self.search_movies(query).await,
            MediaKind::Series => self.search_tv(query).await,
            MediaKind::Book => Err(ExternalCatalogError::UnsupportedKind(kind)),
        }
    }

    async fn trending(&self, kind: MediaKind) -> Result<Vec<CatalogHit>, ExternalCatalogError> {
        match kind {
            MediaKind::Movie => self.trending_movies().await,
            MediaKind::Series => self.trending_tv().await,
            MediaKind::Book => Err(ExternalCatalogError::UnsupportedKind(kind)),
        }
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u32,
    title: String,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvResult {
    id: u32,
    name: String,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(TmdbConfig {
            api_key: "test-key".to_string(),
            base_url: None,
            image_base_url: None,
            language: None,
        })
        .unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        let result = TmdbClient::new(TmdbConfig {
            api_key: " ".to_string(),
            base_url: None,
            image_base_url: None,
            language: None,
        });
        assert!(matches!(result, Err(ExternalCatalogError::NotConfigured(_))));
    }

    #[test]
    fn test_movie_page_conversion() {
        let page: TmdbPage<TmdbMovieResult> = serde_json::from_str(
            r#"{"page":1,"results":[{
                "id": 603,
                "title": "The Matrix",
                "release_date": "1999-03-30",
                "overview": "A computer hacker...",
                "poster_path": "/poster.jpg",
                "vote_average": 8.2,
                "genre_ids": [28, 878]
            }]}"#,
        )
        .unwrap();

        let hits = client().movie_hits(page);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].external_id, "603");
        assert_eq!(hits[0].kind, MediaKind::Movie);
        assert_eq!(
            hits[0].image.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert_eq!(hits[0].rating, Some(8.2));
        assert_eq!(hits[0].genre_hints, GenreHints::TmdbIds(vec![28, 878]));
    }

    #[test]
    fn test_tv_page_conversion() {
        let page: TmdbPage<TmdbTvResult> = serde_json::from_str(
            r#"{"results":[{
                "id": 1396,
                "name": "Breaking Bad",
                "first_air_date": "",
                "overview": null,
                "poster_path": null
            }]}"#,
        )
        .unwrap();

        let hits = client().tv_hits(page);
        assert_eq!(hits[0].title, "Breaking Bad");
        assert_eq!(hits[0].kind, MediaKind::Series);
        assert!(hits[0].image.is_none());
        assert!(hits[0].release_date.is_none());
        assert_eq!(hits[0].genre_hints, GenreHints::TmdbIds(vec![]));
    }

    #[tokio::test]
    async fn test_books_are_unsupported() {
        let err = client().search("dune", MediaKind::Book).await.unwrap_err();
        assert!(matches!(
            err,
            ExternalCatalogError::UnsupportedKind(MediaKind::Book)
        ));
    }
}
