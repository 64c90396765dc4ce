//! Passive DNS Common Output Format (draft-dulaunoy-dnsop-passive-dns-cof).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A number that may arrive as an integer, a float or a numeric string.
///
/// Sensors disagree on how they encode `time_first`/`time_last`/`count`, so
/// the normalizer accepts all three and truncates fractions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(u64),
    Float(f64),
    Text(String),
}

impl Numeric {
    /// Whole, non-negative value with any fractional part dropped.
    pub fn truncated(&self) -> Option<u64> {
        match self {
            Numeric::Int(v) => Some(*v),
            Numeric::Float(v) if v.is_finite() && *v >= 0.0 => Some(v.trunc() as u64),
            Numeric::Float(_) => None,
            Numeric::Text(s) => truncate_decimal(s),
        }
    }
}

/// `"1548624738.280922"` -> `1548624738`. Rejects signs, exponents and garbage.
pub fn truncate_decimal(s: &str) -> Option<u64> {
    let s = s.trim();
    let whole = match s.split_once('.') {
        Some((whole, frac)) => {
            if !frac.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            whole
        }
        None => s,
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}

/// A COF object as submitted by a sensor or found in an import file.
///
/// Every field is optional at this layer; the normalizer decides what is
/// required. Unknown keys (`bailiwick`, `origin`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CofInput {
    #[serde(default)]
    pub rrname: Option<String>,
    #[serde(default)]
    pub rrtype: Option<String>,
    #[serde(default)]
    pub rdata: Option<String>,
    #[serde(default)]
    pub time_first: Option<Numeric>,
    #[serde(default)]
    pub time_last: Option<Numeric>,
    #[serde(default)]
    pub count: Option<Numeric>,
    #[serde(default)]
    pub sensor_id: Option<String>,
}

/// A record as served by the query endpoints.
///
/// Field order is the wire order of each NDJSON line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CofRecord {
    pub time_first: u64,
    pub time_last: Option<u64>,
    pub count: Option<u64>,
    pub rrtype: String,
    pub rrname: String,
    pub rdata: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Collapses structurally identical records, keeping the first occurrence.
pub fn dedup(records: Vec<CofRecord>) -> Vec<CofRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect()
}

/// Serializes records as newline-delimited JSON, one object per line.
pub fn to_ndjson(records: &[CofRecord]) -> Result<String, serde_json::Error> {
    let mut out = String::with_capacity(records.len() * 128);
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}
