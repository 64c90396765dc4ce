use super::QueryTerm;
use crate::services::QueryEngine;
use pdns_cof_domain::cof::dedup;
use pdns_cof_domain::CofRecord;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Direct lookup: an address fans out through the reverse index to the names
/// that pointed at it; a name is looked up as is.
pub struct QueryRecordsUseCase {
    engine: Arc<QueryEngine>,
}

impl QueryRecordsUseCase {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, term: &str) -> Vec<CofRecord> {
        let Some(term) = QueryTerm::parse(term) else {
            return Vec::new();
        };

        let records = match &term {
            QueryTerm::Address(address) => fan_out(&self.engine, address).await,
            QueryTerm::Name(name) => self.engine.forward(name).await,
        };

        let records = dedup(records);
        debug!(%term, records = records.len(), "Query answered");
        records
    }
}

/// Forward records of every name found in the reverse index for `value`.
pub(crate) async fn fan_out(engine: &QueryEngine, value: &str) -> Vec<CofRecord> {
    let mut records = Vec::new();
    for name in engine.reverse(value).await {
        records.extend(engine.forward(name.trim()).await);
    }
    records
}
