use super::{types::Config, ConfigError, StorageBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Search timeout is positive
/// - SQLite storage has a path
/// - A configured TMDB section carries an API key
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.search.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.storage.backend == StorageBackend::Sqlite
        && config.storage.path.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "storage.path is required for the sqlite backend".to_string(),
        ));
    }

    if let Some(tmdb) = &config.providers.tmdb {
        if tmdb.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.tmdb.api_key cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
