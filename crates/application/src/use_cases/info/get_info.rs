use crate::services::AggregationStore;
use pdns_cof_domain::{DomainError, StoreStats};
use std::sync::Arc;
use tracing::instrument;

pub struct GetInfoUseCase {
    store: Arc<AggregationStore>,
}

impl GetInfoUseCase {
    pub fn new(store: Arc<AggregationStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<StoreStats, DomainError> {
        self.store.stats().await
    }
}
