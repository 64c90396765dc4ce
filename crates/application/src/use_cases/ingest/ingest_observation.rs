use crate::services::{AggregationStore, MergeProgress};
use pdns_cof_domain::{CofInput, DomainError, Normalizer, Observation};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Normalizes one raw event and merges it into the aggregation store.
///
/// Rejections (`is_rejection()`) mean the record was dropped on purpose;
/// `StoreUnavailable` means it was valid but could not be written.
pub struct IngestObservationUseCase {
    normalizer: Arc<Normalizer>,
    store: Arc<AggregationStore>,
}

impl IngestObservationUseCase {
    pub fn new(normalizer: Arc<Normalizer>, store: Arc<AggregationStore>) -> Self {
        Self { normalizer, store }
    }

    /// `timestamp||ip-src||ip-dst||class||name||type||value||ttl||count`
    #[instrument(skip(self, line))]
    pub async fn execute_line(&self, line: &str) -> Result<Observation, DomainError> {
        let observation = self.normalizer.normalize_line(line)?;
        debug!(?observation, "Parsed raw line");
        self.store.merge(&observation).await?;
        Ok(observation)
    }

    #[instrument(skip(self, input))]
    pub async fn execute_cof(&self, input: CofInput) -> Result<Observation, DomainError> {
        let observation = self.normalizer.normalize_cof(input)?;
        debug!(?observation, "Parsed COF record");
        self.store.merge(&observation).await?;
        Ok(observation)
    }

    /// One JSON COF object, as found on an NDJSON line or a push stream.
    pub async fn execute_cof_json(&self, json: &str) -> Result<Observation, DomainError> {
        self.execute_cof(parse_cof_json(json)?).await
    }

    /// Dispatches on the first byte: `{` is COF JSON, anything else a raw line.
    pub async fn execute_raw(&self, raw: &str) -> Result<Observation, DomainError> {
        let observation = self.normalize_raw(raw)?;
        self.store.merge(&observation).await?;
        Ok(observation)
    }

    /// The normalizing half of [`execute_raw`](Self::execute_raw), for callers
    /// that retry the merge themselves.
    pub fn normalize_raw(&self, raw: &str) -> Result<Observation, DomainError> {
        let observation = if raw.trim_start().starts_with('{') {
            self.normalizer.normalize_cof(parse_cof_json(raw)?)?
        } else {
            self.normalizer.normalize_line(raw)?
        };
        debug!(?observation, "Parsed queue item");
        Ok(observation)
    }

    /// Merges an already normalized observation, resuming after the steps in
    /// `progress`.
    pub async fn merge(
        &self,
        observation: &Observation,
        progress: &mut MergeProgress,
    ) -> Result<(), DomainError> {
        self.store.merge_resuming(observation, progress).await
    }
}

fn parse_cof_json(json: &str) -> Result<CofInput, DomainError> {
    serde_json::from_str(json.trim())
        .map_err(|e| DomainError::MalformedRecord(format!("invalid COF JSON: {e}")))
}
