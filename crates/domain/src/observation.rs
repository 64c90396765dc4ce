use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an observation came from. Decides the counter policy in `auto` mode
/// and whether distribution histograms are updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationSource {
    /// `timestamp||ip-src||ip-dst||class||name||type||value||ttl||count`
    RawLine,
    /// A structured Common Output Format object.
    Cof,
}

impl ObservationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationSource::RawLine => "raw_line",
            ObservationSource::Cof => "cof",
        }
    }
}

impl fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical resolution event, as produced by the normalizer.
///
/// `name` and `value` are already lower-cased with one trailing dot removed,
/// and `type_code` is guaranteed to be in the registry's supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub name: String,
    pub value: String,
    pub type_code: u16,
    pub first_seen: u64,
    pub last_seen: u64,
    pub count: Option<u64>,
    pub sensor_id: Option<String>,
    pub ttl: Option<String>,
    pub class: Option<String>,
    pub source: ObservationSource,
}

impl Observation {
    pub fn new(name: impl Into<String>, value: impl Into<String>, type_code: u16, seen: u64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            type_code,
            first_seen: seen,
            last_seen: seen,
            count: None,
            sensor_id: None,
            ttl: None,
            class: None,
            source: ObservationSource::Cof,
        }
    }

    pub fn with_window(mut self, first_seen: u64, last_seen: u64) -> Self {
        self.first_seen = first_seen;
        self.last_seen = last_seen;
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_sensor(mut self, sensor_id: impl Into<String>) -> Self {
        self.sensor_id = Some(sensor_id.into());
        self
    }

    pub fn with_source(mut self, source: ObservationSource) -> Self {
        self.source = source;
        self
    }
}

/// How the occurrence counter `o:{name}:{value}:{type}` is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterPolicy {
    /// Raw-line observations increment; COF observations carrying a count
    /// overwrite.
    #[default]
    Auto,
    /// Always add one, ignoring any carried count.
    Increment,
    /// Overwrite with the carried count; add one when none is carried.
    Overwrite,
}

/// The concrete write a single merge performs on the occurrence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUpdate {
    IncrementBy(u64),
    Set(u64),
}

impl CounterPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(CounterPolicy::Auto),
            "increment" => Some(CounterPolicy::Increment),
            "overwrite" => Some(CounterPolicy::Overwrite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterPolicy::Auto => "auto",
            CounterPolicy::Increment => "increment",
            CounterPolicy::Overwrite => "overwrite",
        }
    }

    pub fn update_for(&self, observation: &Observation) -> CounterUpdate {
        match (self, observation.count, observation.source) {
            (CounterPolicy::Increment, _, _) => CounterUpdate::IncrementBy(1),
            (CounterPolicy::Overwrite, Some(count), _) => CounterUpdate::Set(count),
            (CounterPolicy::Auto, Some(count), ObservationSource::Cof) => CounterUpdate::Set(count),
            _ => CounterUpdate::IncrementBy(1),
        }
    }
}
