use crate::cof::{truncate_decimal, CofInput};
use crate::errors::DomainError;
use crate::exclusion::ExclusionList;
use crate::observation::{Observation, ObservationSource};
use crate::record_type::{RecordTypeRegistry, TXT_CODE};
use std::sync::Arc;

/// Number of `||`-separated fields in a raw passive DNS line.
pub const RAW_LINE_FIELDS: usize = 9;

/// Largest occurrence count the store can hold (a signed 64-bit integer).
pub const MAX_COUNT: u64 = i64::MAX as u64;

const FIELD_SEPARATOR: &str = "||";

/// Lower-cases and removes a single trailing dot: `"WWW.Example.COM."` -> `"www.example.com"`.
pub fn canonical_name(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix('.')
        .unwrap_or(trimmed)
        .to_lowercase()
}

/// Turns raw sensor output into canonical [`Observation`]s.
///
/// Every rejection is a [`DomainError`] for which `is_rejection()` holds:
/// `MalformedRecord`, `UnknownType`, `UnsupportedType` or `ExcludedByPolicy`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    registry: Arc<RecordTypeRegistry>,
    exclusions: ExclusionList,
}

impl Normalizer {
    pub fn new(registry: Arc<RecordTypeRegistry>, exclusions: ExclusionList) -> Self {
        Self {
            registry,
            exclusions,
        }
    }

    pub fn registry(&self) -> &RecordTypeRegistry {
        &self.registry
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    /// Parses `timestamp||ip-src||ip-dst||class||name||type||value||ttl||count`.
    ///
    /// ```text
    /// 1548624738.280922||192.168.1.12||8.8.8.8||IN||www.example.com.||AAAA||2a00:1450::200e||299||12
    /// ```
    pub fn normalize_line(&self, line: &str) -> Result<Observation, DomainError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(DomainError::MalformedRecord("empty line".to_string()));
        }

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != RAW_LINE_FIELDS {
            return Err(DomainError::MalformedRecord(format!(
                "expected {} fields, got {}",
                RAW_LINE_FIELDS,
                fields.len()
            )));
        }

        let timestamp = truncate_decimal(fields[0]).ok_or_else(|| {
            DomainError::MalformedRecord(format!("invalid timestamp {:?}", fields[0]))
        })?;

        let type_code = self.resolve_type(fields[5])?;
        let name = self.accept_name(fields[4])?;
        let value = self.canonical_value(fields[6], type_code)?;

        Ok(Observation {
            name,
            value,
            type_code,
            first_seen: timestamp,
            last_seen: timestamp,
            count: truncate_decimal(fields[8]).map(bounded_count).transpose()?,
            sensor_id: None,
            ttl: non_empty(fields[7]),
            class: non_empty(fields[3]),
            source: ObservationSource::RawLine,
        })
    }

    pub fn normalize_cof(&self, input: CofInput) -> Result<Observation, DomainError> {
        let raw_name = input
            .rrname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DomainError::MalformedRecord("missing rrname".to_string()))?;
        let raw_type = input
            .rrtype
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DomainError::MalformedRecord("missing rrtype".to_string()))?;

        let type_code = self.resolve_type(raw_type)?;
        let name = self.accept_name(raw_name)?;

        let raw_value = input
            .rdata
            .as_deref()
            .ok_or_else(|| DomainError::MalformedRecord("missing rdata".to_string()))?;
        let value = self.canonical_value(raw_value, type_code)?;

        let first = timestamp_field(&input.time_first, "time_first")?;
        let last = timestamp_field(&input.time_last, "time_last")?;
        let (first_seen, last_seen) = match (first, last) {
            (Some(f), Some(l)) => (f.min(l), f.max(l)),
            (Some(t), None) | (None, Some(t)) => (t, t),
            (None, None) => {
                return Err(DomainError::MalformedRecord(
                    "missing time_first and time_last".to_string(),
                ))
            }
        };

        let count = match &input.count {
            Some(raw) => Some(bounded_count(raw.truncated().ok_or_else(|| {
                DomainError::MalformedRecord(format!("invalid count {:?}", raw))
            })?)?),
            None => None,
        };

        Ok(Observation {
            name,
            value,
            type_code,
            first_seen,
            last_seen,
            count,
            sensor_id: input.sensor_id.as_deref().and_then(non_empty),
            ttl: None,
            class: None,
            source: ObservationSource::Cof,
        })
    }

    fn resolve_type(&self, raw: &str) -> Result<u16, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::MalformedRecord("missing type".to_string()));
        }
        let code = self.registry.code_for(raw)?;
        if !self.registry.is_supported(code) {
            return Err(DomainError::UnsupportedType(code));
        }
        Ok(code)
    }

    fn accept_name(&self, raw: &str) -> Result<String, DomainError> {
        let name = canonical_name(raw);
        if name.is_empty() {
            return Err(DomainError::MalformedRecord("missing name".to_string()));
        }
        if let Some(pattern) = self.exclusions.matching(&name) {
            return Err(DomainError::ExcludedByPolicy(format!("{name} ({pattern})")));
        }
        Ok(name)
    }

    fn canonical_value(&self, raw: &str, type_code: u16) -> Result<String, DomainError> {
        let mut value = canonical_name(raw);
        if type_code == TXT_CODE {
            if let Some(rest) = value.strip_prefix('"') {
                value = rest.to_string();
            }
        }
        if value.is_empty() {
            return Err(DomainError::MalformedRecord("missing value".to_string()));
        }
        Ok(value)
    }
}

fn timestamp_field(
    raw: &Option<crate::cof::Numeric>,
    field: &str,
) -> Result<Option<u64>, DomainError> {
    match raw {
        Some(value) => value
            .truncated()
            .map(Some)
            .ok_or_else(|| DomainError::MalformedRecord(format!("invalid {field} {:?}", value))),
        None => Ok(None),
    }
}

fn bounded_count(count: u64) -> Result<u64, DomainError> {
    if count > MAX_COUNT {
        return Err(DomainError::MalformedRecord(format!(
            "count {count} out of range"
        )));
    }
    Ok(count)
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
