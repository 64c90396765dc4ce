use super::errors::ConfigError;
use super::{
    IngestConfig, LoggingConfig, QueryConfig, QueueConfig, RegistryConfig, ServerConfig,
    StoreConfig,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_STORE_HOST: &str = "D4_ANALYZER_REDIS_HOST";
pub const ENV_STORE_PORT: &str = "D4_ANALYZER_REDIS_PORT";

/// Values given on the command line; they win over the file and environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub store_host: Option<String>,
    pub store_port: Option<u16>,
    pub bind_address: Option<String>,
    pub web_port: Option<u16>,
    pub queue_uuid: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Layers defaults, the optional TOML file, the environment and CLI overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_STORE_HOST).filter(|h| !h.is_empty()) {
            self.store.host = host;
        }
        if let Some(port) = lookup(ENV_STORE_PORT).filter(|p| !p.is_empty()) {
            self.store.port = port.trim().parse().map_err(|_| ConfigError::Environment {
                name: ENV_STORE_PORT.to_string(),
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(host) = overrides.store_host {
            self.store.host = host;
        }
        if let Some(port) = overrides.store_port {
            self.store.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.web_port {
            self.server.port = port;
        }
        if let Some(uuid) = overrides.queue_uuid {
            self.queue.uuid = uuid;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.host.trim().is_empty() {
            return Err(ConfigError::Validation("store.host is empty".to_string()));
        }
        if self.query.max_set_size == 0 {
            return Err(ConfigError::Validation(
                "query.max_set_size must be at least 1".to_string(),
            ));
        }
        if self.query.scan_page_size == 0 {
            return Err(ConfigError::Validation(
                "query.scan_page_size must be at least 1".to_string(),
            ));
        }
        if self.registry.supported.is_empty() {
            return Err(ConfigError::Validation(
                "registry.supported lists no record types".to_string(),
            ));
        }
        Ok(())
    }

    /// Ingestion additionally needs to know which queue to drain.
    pub fn validate_for_ingest(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.queue.uuid.trim().is_empty() {
            return Err(ConfigError::Validation(
                "queue.uuid is required for ingestion".to_string(),
            ));
        }
        if !self.queue.d4_server.contains(':') {
            return Err(ConfigError::Validation(format!(
                "queue.d4_server must be host:port, got {:?}",
                self.queue.d4_server
            )));
        }
        Ok(())
    }
}
