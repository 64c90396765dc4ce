pub mod ingestion;
pub mod runner;

pub use ingestion::{IngestionCounters, IngestionJob};
pub use runner::JobRunner;
