pub mod full_query;
pub mod query_records;
pub mod term;

pub use full_query::FullQueryUseCase;
pub use query_records::QueryRecordsUseCase;
pub use term::QueryTerm;
