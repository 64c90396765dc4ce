use crate::exclusion::DEFAULT_EXCLUSIONS;
use crate::observation::CounterPolicy;
use serde::{Deserialize, Serialize};

/// Ingestion settings shared by the queue ingester and file importer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Names containing any of these substrings are never aggregated
    #[serde(default = "default_exclusions")]
    pub exclude_substrings: Vec<String>,

    /// "auto", "increment" or "overwrite" (default: "auto")
    #[serde(default)]
    pub counter_policy: CounterPolicy,

    /// Sleep between polls of an empty queue, in milliseconds (default: 1000)
    #[serde(default = "default_idle_backoff_ms")]
    pub idle_backoff_ms: u64,

    /// Retries per record after a store failure; 0 logs it and moves on (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Update the dist:ttl / dist:class / dist:type histograms (default: true)
    #[serde(default = "default_true")]
    pub histograms: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            exclude_substrings: default_exclusions(),
            counter_policy: CounterPolicy::Auto,
            idle_backoff_ms: default_idle_backoff_ms(),
            max_retries: default_max_retries(),
            histograms: true,
        }
    }
}

fn default_exclusions() -> Vec<String> {
    DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_idle_backoff_ms() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    3
}

fn default_true() -> bool {
    true
}
