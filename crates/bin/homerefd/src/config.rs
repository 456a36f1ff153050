//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homeref.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Cache tier settings.
    pub cache: CacheConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Registry source settings.
    pub registry: RegistryConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory of the durable JSON tier.
    pub dir: PathBuf,
    /// Freshness window of cached values, in milliseconds.
    pub ttl_ms: u64,
    /// Period of the background registry refresh, in milliseconds.
    pub refresh_interval_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Registry source configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON registry fixture; the built-in demo home when unset.
    pub fixture: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `homeref.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, if an
    /// override is not a number where one is expected, or if validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("homeref.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("HOMEREF_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("HOMEREF_PORT") {
            self.server.port = parse_number("HOMEREF_PORT", &val)?;
        }
        if let Some(val) = var("HOMEREF_BIND") {
            let (host, port) = val.rsplit_once(':').ok_or_else(|| ConfigError::InvalidEnv {
                key: "HOMEREF_BIND",
                value: val.clone(),
            })?;
            self.server.port = parse_number("HOMEREF_BIND", port)?;
            self.server.host = host.to_string();
        }
        if let Some(val) = var("HOMEREF_CACHE_DIR") {
            self.cache.dir = PathBuf::from(val);
        }
        if let Some(val) = var("HOMEREF_CACHE_TTL") {
            self.cache.ttl_ms = parse_number("HOMEREF_CACHE_TTL", &val)?;
        }
        if let Some(val) = var("HOMEREF_REFRESH_INTERVAL") {
            self.cache.refresh_interval_ms = parse_number("HOMEREF_REFRESH_INTERVAL", &val)?;
        }
        if let Some(val) = var("HOMEREF_REGISTRY_FIXTURE") {
            self.registry.fixture = Some(PathBuf::from(val));
        }
        if let Some(val) = var("HOMEREF_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero"));
        }
        if self.cache.ttl_ms == 0 {
            return Err(ConfigError::Validation("cache ttl must be non-zero"));
        }
        if self.cache.refresh_interval_ms == 0 {
            return Err(ConfigError::Validation("refresh interval must be non-zero"));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache.ttl_ms)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.cache.refresh_interval_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".homeref-cache"),
            ttl_ms: 300_000,
            refresh_interval_ms: 60_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homerefd=info,homeref=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// An environment override could not be parsed.
    #[error("invalid value `{value}` for {key}")]
    InvalidEnv { key: &'static str, value: String },
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(&'static str),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.dir, PathBuf::from(".homeref-cache"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert!(config.registry.fixture.is_none());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [cache]
            dir = '/var/cache/homeref'
            ttl_ms = 1000
            refresh_interval_ms = 500

            [logging]
            filter = 'debug'

            [registry]
            fixture = 'home.json'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.cache.dir, PathBuf::from("/var/cache/homeref"));
        assert_eq!(config.cache.ttl_ms, 1000);
        assert_eq!(config.cache.refresh_interval_ms, 500);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.registry.fixture, Some(PathBuf::from("home.json")));
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [cache]
            ttl_ms = 5000
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.ttl_ms, 5000);
        assert_eq!(config.cache.refresh_interval_ms, 60_000);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(overrides(&[
                ("HOMEREF_HOST", "127.0.0.1"),
                ("HOMEREF_PORT", "8080"),
                ("HOMEREF_CACHE_DIR", "/tmp/cache"),
                ("HOMEREF_CACHE_TTL", "1500"),
                ("HOMEREF_REFRESH_INTERVAL", "750"),
                ("HOMEREF_REGISTRY_FIXTURE", "fixture.json"),
                ("HOMEREF_LOG", "debug"),
            ]))
            .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.cache.dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.cache_ttl(), Duration::from_millis(1500));
        assert_eq!(config.refresh_interval(), Duration::from_millis(750));
        assert_eq!(config.registry.fixture, Some(PathBuf::from("fixture.json")));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_prefer_bind_over_host_and_port() {
        let mut config = Config::default();
        config
            .apply_overrides(overrides(&[
                ("HOMEREF_PORT", "8080"),
                ("HOMEREF_BIND", "localhost:9999"),
            ]))
            .unwrap();
        assert_eq!(config.bind_addr(), "localhost:9999");
    }

    #[test]
    fn should_prefer_rust_log_over_homeref_log() {
        let mut config = Config::default();
        config
            .apply_overrides(overrides(&[("HOMEREF_LOG", "debug"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_reject_non_numeric_override() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(overrides(&[("HOMEREF_CACHE_TTL", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                key: "HOMEREF_CACHE_TTL",
                ..
            }
        ));
    }

    #[test]
    fn should_reject_bind_without_port() {
        let mut config = Config::default();
        assert!(
            config
                .apply_overrides(overrides(&[("HOMEREF_BIND", "localhost")]))
                .is_err()
        );
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_ttl_and_interval() {
        let mut config = Config::default();
        config.cache.ttl_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.refresh_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }
}
