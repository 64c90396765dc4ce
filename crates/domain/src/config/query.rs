use serde::{Deserialize, Serialize};

/// What a forward lookup does with an `r:{name}:{type}` set at or above
/// `max_set_size` members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OversizedSetPolicy {
    /// The type contributes no records.
    #[default]
    Skip,
    /// The set is read completely in `scan_page_size` pages.
    Scan,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Forward sets with this many members or more are oversized (default: 200)
    #[serde(default = "default_max_set_size")]
    pub max_set_size: u64,

    #[serde(default)]
    pub oversized_sets: OversizedSetPolicy,

    /// SSCAN COUNT hint when `oversized_sets = "scan"` (default: 100)
    #[serde(default = "default_scan_page_size")]
    pub scan_page_size: usize,

    /// Static `origin` attached to every served record
    #[serde(default)]
    pub origin: Option<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_set_size: default_max_set_size(),
            oversized_sets: OversizedSetPolicy::Skip,
            scan_page_size: default_scan_page_size(),
            origin: None,
        }
    }
}

fn default_max_set_size() -> u64 {
    200
}

fn default_scan_page_size() -> usize {
    100
}
