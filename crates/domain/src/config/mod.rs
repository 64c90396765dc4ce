//! Configuration module for the passive DNS service
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration, environment and CLI overrides
//! - `store`: Aggregation store connection
//! - `queue`: D4 analyzer queue the ingester drains
//! - `ingest`: Exclusions, counter policy, backoff and retries
//! - `query`: Oversized set handling and origin metadata
//! - `registry`: Record type table and supported subset
//! - `server`: HTTP binding
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod ingest;
pub mod logging;
pub mod query;
pub mod queue;
pub mod registry;
pub mod root;
pub mod server;
pub mod store;

pub use errors::ConfigError;
pub use ingest::IngestConfig;
pub use logging::LoggingConfig;
pub use query::{OversizedSetPolicy, QueryConfig};
pub use queue::QueueConfig;
pub use registry::RegistryConfig;
pub use root::{CliOverrides, Config, ENV_STORE_HOST, ENV_STORE_PORT};
pub use server::ServerConfig;
pub use store::StoreConfig;
