use serde::{Deserialize, Serialize};

/// Upstream D4 server list the ingester drains
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// `host:port` of the D4 server's Redis (default: "127.0.0.1:6380")
    #[serde(default = "default_d4_server")]
    pub d4_server: String,

    /// Database holding the analyzer queues (default: 2)
    #[serde(default = "default_db")]
    pub db: i64,

    /// Analyzer UUID registered on the D4 server; the queue is `analyzer:8:{uuid}`
    #[serde(default)]
    pub uuid: String,

    /// Push lines that could not be stored to `analyzer:8:{uuid}:failed` (default: true)
    #[serde(default = "default_true")]
    pub dead_letter: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            d4_server: default_d4_server(),
            db: default_db(),
            uuid: String::new(),
            dead_letter: true,
        }
    }
}

impl QueueConfig {
    pub fn url(&self) -> String {
        format!("redis://{}/{}", self.d4_server, self.db)
    }
}

fn default_d4_server() -> String {
    "127.0.0.1:6380".to_string()
}

fn default_db() -> i64 {
    2
}

fn default_true() -> bool {
    true
}
