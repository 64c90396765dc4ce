use crate::services::AggregationStore;
use pdns_cof_domain::config::QueryConfig;
use pdns_cof_domain::{CofRecord, DomainError, OversizedSetPolicy, RecordTypeRegistry};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Rebuilds COF records from the aggregation store.
///
/// Lookups are best-effort: a store error on one record type is logged and
/// that type is left out, so callers always get whatever could be read.
pub struct QueryEngine {
    store: Arc<AggregationStore>,
    registry: Arc<RecordTypeRegistry>,
    max_set_size: u64,
    oversized: OversizedSetPolicy,
    scan_page_size: usize,
    origin: Option<String>,
}

impl QueryEngine {
    pub fn new(store: Arc<AggregationStore>, registry: Arc<RecordTypeRegistry>) -> Self {
        Self::with_config(store, registry, &QueryConfig::default())
    }

    pub fn with_config(
        store: Arc<AggregationStore>,
        registry: Arc<RecordTypeRegistry>,
        config: &QueryConfig,
    ) -> Self {
        Self {
            store,
            registry,
            max_set_size: config.max_set_size,
            oversized: config.oversized_sets,
            scan_page_size: config.scan_page_size,
            origin: config.origin.clone(),
        }
    }

    /// Every record stored for `name`, across all supported types.
    pub async fn forward(&self, name: &str) -> Vec<CofRecord> {
        let mut records = Vec::new();
        for (code, rrtype) in self.registry.supported() {
            if let Err(e) = self.forward_type(name, code, rrtype, &mut records).await {
                warn!(name, rrtype, error = %e, "Forward lookup failed for type");
            }
        }
        records
    }

    async fn forward_type(
        &self,
        name: &str,
        code: u16,
        rrtype: &str,
        out: &mut Vec<CofRecord>,
    ) -> Result<(), DomainError> {
        let size = self.store.forward_cardinality(name, code).await?;
        if size == 0 {
            return Ok(());
        }

        let values = if size < self.max_set_size {
            self.store.forward_members(name, code).await?
        } else {
            match self.oversized {
                OversizedSetPolicy::Skip => {
                    debug!(name, rrtype, size, "Oversized forward set skipped");
                    return Ok(());
                }
                OversizedSetPolicy::Scan => {
                    self.store
                        .forward_scan(name, code, self.scan_page_size)
                        .await?
                }
            }
        };

        for raw in values {
            let rdata = raw.trim();
            let Some(time_first) = self.store.first_seen(name, rdata, code).await? else {
                // A value without first-seen means the indexes and the
                // aggregates disagree; nothing after it is trusted.
                warn!(name, rdata, rrtype, "Missing first-seen, stopping type");
                break;
            };
            let time_last = self.store.last_seen(name, rdata, code).await?;
            let count = self.store.count(name, rdata, code).await?;

            out.push(CofRecord {
                time_first,
                time_last,
                count,
                rrtype: rrtype.to_string(),
                rrname: name.to_string(),
                rdata: rdata.to_string(),
                origin: self.origin.clone(),
            });
        }
        Ok(())
    }

    /// Names that resolved to `value`, across all supported types, in first-seen order.
    pub async fn reverse(&self, value: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut names = Vec::new();
        for (code, rrtype) in self.registry.supported() {
            match self.store.reverse_members(value, code).await {
                Ok(members) => {
                    for name in members {
                        if seen.insert(name.clone()) {
                            names.push(name);
                        }
                    }
                }
                Err(e) => {
                    warn!(value, rrtype, error = %e, "Reverse lookup failed for type");
                }
            }
        }
        names
    }
}
