pub mod aggregation_store;
pub mod query_engine;

pub use aggregation_store::{AggregationStore, MergeProgress, MergeStep};
pub use query_engine::QueryEngine;
