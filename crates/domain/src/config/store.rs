use serde::{Deserialize, Serialize};

/// Connection to the Redis-compatible aggregation store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Host of the store (default: "127.0.0.1", env: D4_ANALYZER_REDIS_HOST)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of the store (default: 6400, env: D4_ANALYZER_REDIS_PORT)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logical database index (default: 0)
    #[serde(default)]
    pub db: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
        }
    }
}

impl StoreConfig {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6400
}
