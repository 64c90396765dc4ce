pub mod info;
pub mod ingest;
pub mod query;

// Re-export use cases
pub use info::GetInfoUseCase;
pub use ingest::IngestObservationUseCase;
pub use query::{FullQueryUseCase, QueryRecordsUseCase, QueryTerm};
