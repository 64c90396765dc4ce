//! Key layout of the aggregation store.
//!
//! | Key | Kind | Content |
//! |---|---|---|
//! | `r:{name}:{type}` | set | values seen for `name` |
//! | `v:{value}:{type}` | set | names that resolved to `value` |
//! | `s:{name}:{value}:{type}` | string | first-seen epoch, written once |
//! | `l:{name}:{value}:{type}` | string | last-seen epoch, monotonic max |
//! | `o:{name}:{value}:{type}` | string | occurrence count |
//! | `stats:processed` | string | merged observations |
//! | `stats:sensors` | sorted set | sensor id -> observations |
//! | `sensors:seen` | set | sensor ids |
//! | `dist:ttl`, `dist:class`, `dist:type` | hash | histogram buckets |
//!
//! Existing deployments read these keys directly, so the layout is fixed.

pub const STATS_PROCESSED: &str = "stats:processed";
pub const STATS_SENSORS: &str = "stats:sensors";
pub const SENSORS_SEEN: &str = "sensors:seen";
pub const DIST_TTL: &str = "dist:ttl";
pub const DIST_CLASS: &str = "dist:class";
pub const DIST_TYPE: &str = "dist:type";

pub fn forward(name: &str, type_code: u16) -> String {
    format!("r:{name}:{type_code}")
}

pub fn reverse(value: &str, type_code: u16) -> String {
    format!("v:{value}:{type_code}")
}

pub fn first_seen(name: &str, value: &str, type_code: u16) -> String {
    format!("s:{name}:{value}:{type_code}")
}

pub fn last_seen(name: &str, value: &str, type_code: u16) -> String {
    format!("l:{name}:{value}:{type_code}")
}

pub fn occurrences(name: &str, value: &str, type_code: u16) -> String {
    format!("o:{name}:{value}:{type_code}")
}

/// Redis list the D4 server fills for analyzer type 8 (passive DNS).
pub fn analyzer_queue(uuid: &str) -> String {
    format!("analyzer:8:{uuid}")
}

pub fn dead_letter_queue(uuid: &str) -> String {
    format!("analyzer:8:{uuid}:failed")
}
