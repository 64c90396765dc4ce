use pdns_cof_domain::StoreStats;
use serde::Serialize;

pub const SOFTWARE: &str = "analyzer-d4-passivedns";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SensorResponse {
    pub sensor_id: String,
    pub count: u64,
}

#[derive(Serialize, Debug, Clone)]
pub struct InfoResponse {
    pub version: String,
    pub software: &'static str,
    /// Number of observations merged so far (`stats:processed`)
    pub stats: u64,
    /// Per-sensor counts, highest first
    pub sensors: Vec<SensorResponse>,
}

impl InfoResponse {
    pub fn new(version: &str, stats: StoreStats) -> Self {
        Self {
            version: version.to_string(),
            software: SOFTWARE,
            stats: stats.processed,
            sensors: stats
                .sensors
                .into_iter()
                .map(|s| SensorResponse {
                    sensor_id: s.sensor_id,
                    count: s.count,
                })
                .collect(),
        }
    }

    pub fn empty(version: &str) -> Self {
        Self::new(version, StoreStats::default())
    }
}
