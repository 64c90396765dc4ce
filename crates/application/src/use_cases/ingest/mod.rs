pub mod ingest_observation;

pub use ingest_observation::IngestObservationUseCase;
