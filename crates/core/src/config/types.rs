use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::external_catalog::{GoogleBooksConfig, TmdbConfig};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8080
}

/// Key-value storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("myshelf.db")
}

/// Available storage backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// External search behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Upper bound for a single provider call, in seconds (default: 10)
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u32,
    /// Query used to build the default book list, since Google Books has no
    /// trending endpoint
    #[serde(default = "default_books_trending_query")]
    pub books_trending_query: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_search_timeout(),
            books_trending_query: default_books_trending_query(),
        }
    }
}

fn default_search_timeout() -> u32 {
    10
}

fn default_books_trending_query() -> String {
    "subject:fiction".to_string()
}

/// External catalog providers. A missing section disables that provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub google_books: Option<GoogleBooksConfig>,
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub search: SearchConfig,
    pub providers: SanitizedProvidersConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProvidersConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_books: Option<SanitizedGoogleBooksConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<SanitizedTmdbConfig>,
}

/// Sanitized Google Books config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGoogleBooksConfig {
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_restrict: Option<String>,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            storage: config.storage.clone(),
            search: config.search.clone(),
            providers: SanitizedProvidersConfig {
                google_books: config.providers.google_books.as_ref().map(|g| {
                    SanitizedGoogleBooksConfig {
                        api_key_configured: g.api_key.as_ref().is_some_and(|k| !k.is_empty()),
                        lang_restrict: g.lang_restrict.clone(),
                    }
                }),
                tmdb: config
                    .providers
                    .tmdb
                    .as_ref()
                    .map(|t| SanitizedTmdbConfig {
                        api_key_configured: !t.api_key.is_empty(),
                        language: t.language.clone(),
                    }),
            },
        }
    }
}
