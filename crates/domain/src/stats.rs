use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorCount {
    pub sensor_id: String,
    pub count: u64,
}

/// Aggregate counters reported by `/info`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub processed: u64,
    /// Ranked by count, highest first.
    pub sensors: Vec<SensorCount>,
}
