use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// Nested keys are separated by a double underscore, e.g.
/// `MYSHELF_SERVER__PORT=9000` or `MYSHELF_PROVIDERS__TMDB__API_KEY=...`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("MYSHELF_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use figment::Jail;

    const FILE: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[storage]
backend = "memory"

[providers.tmdb]
api_key = "from-file"
"#;

    fn load(jail: &Jail) -> figment::error::Result<Config> {
        load_config(&jail.directory().join("myshelf.toml")).map_err(|e| e.to_string().into())
    }

    #[test]
    fn test_file_values_without_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file("myshelf.toml", FILE)?;
            let config = load(jail)?;

            assert_eq!(config.server.port, 3000);
            assert_eq!(config.server.host.to_string(), "127.0.0.1");
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            assert_eq!(config.search.timeout_secs, 10);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("myshelf.toml", FILE)?;
            jail.set_env("MYSHELF_SERVER__PORT", "9100");
            jail.set_env("MYSHELF_SEARCH__TIMEOUT_SECS", "3");
            jail.set_env("MYSHELF_PROVIDERS__TMDB__API_KEY", "from-env");
            let config = load(jail)?;

            assert_eq!(config.server.port, 9100);
            assert_eq!(config.search.timeout_secs, 3);
            assert_eq!(
                config.providers.tmdb.map(|t| t.api_key).as_deref(),
                Some("from-env")
            );
            // Untouched keys keep their file values
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            Ok(())
        });
    }

    #[test]
    fn test_single_underscore_is_not_a_separator() {
        Jail::expect_with(|jail| {
            jail.create_file("myshelf.toml", FILE)?;
            jail.set_env("MYSHELF_SEARCH__BOOKS_TRENDING_QUERY", "subject:poetry");
            let config = load(jail)?;

            assert_eq!(config.search.books_trending_query, "subject:poetry");
            Ok(())
        });
    }

    #[test]
    fn test_env_value_of_wrong_type_is_a_parse_error() {
        Jail::expect_with(|jail| {
            jail.create_file("myshelf.toml", FILE)?;
            jail.set_env("MYSHELF_SERVER__PORT", "not-a-port");

            let result = load_config(&jail.directory().join("myshelf.toml"));
            assert!(matches!(result, Err(ConfigError::ParseError(_))));
            Ok(())
        });
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_str() {
        let toml = r#"
[storage]
backend = "sqlite"
path = "shelf.db"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.server.port, 8080);
    }
}
