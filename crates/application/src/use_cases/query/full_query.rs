use super::query_records::fan_out;
use super::QueryTerm;
use crate::services::QueryEngine;
use pdns_cof_domain::cof::dedup;
use pdns_cof_domain::CofRecord;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One hop further than [`super::QueryRecordsUseCase`] for names: the name is
/// treated as a value (the target of CNAME, NS, MX, ... records), and the
/// names pointing at it are forward-queried. Addresses behave exactly like a
/// direct query.
pub struct FullQueryUseCase {
    engine: Arc<QueryEngine>,
}

impl FullQueryUseCase {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, term: &str) -> Vec<CofRecord> {
        let Some(term) = QueryTerm::parse(term) else {
            return Vec::new();
        };

        let records = dedup(fan_out(&self.engine, term.as_str()).await);
        debug!(%term, records = records.len(), "Full query answered");
        records
    }
}
