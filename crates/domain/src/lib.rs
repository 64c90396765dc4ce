//! Passive DNS Domain Layer
pub mod cof;
pub mod config;
pub mod errors;
pub mod exclusion;
pub mod keyspace;
pub mod normalizer;
pub mod observation;
pub mod record_type;
pub mod stats;

pub use cof::{CofInput, CofRecord, Numeric};
pub use config::{CliOverrides, Config, ConfigError, OversizedSetPolicy};
pub use errors::DomainError;
pub use exclusion::ExclusionList;
pub use normalizer::{canonical_name, Normalizer};
pub use observation::{CounterPolicy, CounterUpdate, Observation, ObservationSource};
pub use record_type::RecordTypeRegistry;
pub use stats::{SensorCount, StoreStats};
