use crate::ports::KeyValueStore;
use pdns_cof_domain::cof::truncate_decimal;
use pdns_cof_domain::keyspace;
use pdns_cof_domain::{
    CounterPolicy, CounterUpdate, DomainError, Observation, ObservationSource, SensorCount,
    StoreStats,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// The writes of one merge, in the order they are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStep {
    Indexes,
    FirstSeen,
    LastSeen,
    Counter,
    Processed,
    Sensor,
    TtlHistogram,
    ClassHistogram,
    TypeHistogram,
}

impl MergeStep {
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// The merge steps that have already landed for one observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeProgress(u16);

impl MergeProgress {
    pub fn is_pending(&self, step: MergeStep) -> bool {
        self.0 & step.bit() == 0
    }

    pub fn is_started(&self) -> bool {
        self.0 != 0
    }

    fn complete(&mut self, step: MergeStep) {
        self.0 |= step.bit();
    }
}

/// Folds observations into the per-(name, value, type) aggregates and reads
/// them back.
///
/// Merge rules, per observation:
///   1. `SADD r:{name}:{type} value`
///   2. `SADD v:{value}:{type} name`
///   3. `s:` first-seen is written only if absent (earliest stored wins)
///   4. `l:` last-seen is raised, never lowered
///   5. `o:` occurrence count is incremented or overwritten per [`CounterPolicy`]
///   6. stats counters, and histograms for raw lines
///
/// Each step that increments is issued exactly once per [`MergeProgress`];
/// the others are safe to repeat.
pub struct AggregationStore {
    kv: Arc<dyn KeyValueStore>,
    counter_policy: CounterPolicy,
    histograms: bool,
}

impl AggregationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            counter_policy: CounterPolicy::Auto,
            histograms: true,
        }
    }

    pub fn with_counter_policy(mut self, policy: CounterPolicy) -> Self {
        self.counter_policy = policy;
        self
    }

    pub fn with_histograms(mut self, enabled: bool) -> Self {
        self.histograms = enabled;
        self
    }

    pub fn counter_policy(&self) -> CounterPolicy {
        self.counter_policy
    }

    pub async fn merge(&self, obs: &Observation) -> Result<(), DomainError> {
        self.merge_resuming(obs, &mut MergeProgress::default()).await
    }

    /// Merges `obs`, skipping the steps `progress` already holds.
    ///
    /// Each step is marked once its write lands, so calling this again with
    /// the same `progress` after a failure never repeats an increment.
    #[instrument(skip(self, obs, progress), fields(name = %obs.name, value = %obs.value, rrtype = obs.type_code))]
    pub async fn merge_resuming(
        &self,
        obs: &Observation,
        progress: &mut MergeProgress,
    ) -> Result<(), DomainError> {
        let (name, value, code) = (obs.name.as_str(), obs.value.as_str(), obs.type_code);

        if progress.is_pending(MergeStep::Indexes) {
            self.kv.set_add(&keyspace::forward(name, code), value).await?;
            self.kv.set_add(&keyspace::reverse(value, code), name).await?;
            progress.complete(MergeStep::Indexes);
        }

        if progress.is_pending(MergeStep::FirstSeen) {
            let first_key = keyspace::first_seen(name, value, code);
            if self
                .kv
                .set_if_absent(&first_key, &obs.first_seen.to_string())
                .await?
            {
                debug!(key = %first_key, first_seen = obs.first_seen, "First-seen recorded");
            }
            progress.complete(MergeStep::FirstSeen);
        }

        if progress.is_pending(MergeStep::LastSeen) {
            self.raise_last_seen(obs).await?;
            progress.complete(MergeStep::LastSeen);
        }

        if progress.is_pending(MergeStep::Counter) {
            let count_key = keyspace::occurrences(name, value, code);
            match self.counter_policy.update_for(obs) {
                CounterUpdate::IncrementBy(n) => {
                    self.kv.incr_by(&count_key, n as i64).await?;
                }
                CounterUpdate::Set(n) => {
                    self.kv.set(&count_key, &n.to_string()).await?;
                }
            }
            progress.complete(MergeStep::Counter);
        }

        self.record_stats(obs, progress).await
    }

    async fn raise_last_seen(&self, obs: &Observation) -> Result<(), DomainError> {
        let last_key = keyspace::last_seen(&obs.name, &obs.value, obs.type_code);
        let stored_last = self.kv.get(&last_key).await?;
        let advance = match stored_last.as_deref().map(|raw| (raw, truncate_decimal(raw))) {
            None => true,
            Some((_, Some(current))) => current < obs.last_seen,
            Some((raw, None)) => {
                warn!(key = %last_key, stored = raw, "Unparseable last-seen replaced");
                true
            }
        };
        if advance {
            self.kv.set(&last_key, &obs.last_seen.to_string()).await?;
            debug!(key = %last_key, last_seen = obs.last_seen, "Last-seen advanced");
        }
        Ok(())
    }

    async fn record_stats(
        &self,
        obs: &Observation,
        progress: &mut MergeProgress,
    ) -> Result<(), DomainError> {
        if progress.is_pending(MergeStep::Processed) {
            self.kv.incr_by(keyspace::STATS_PROCESSED, 1).await?;
            progress.complete(MergeStep::Processed);
        }

        if let Some(sensor) = obs.sensor_id.as_deref() {
            if progress.is_pending(MergeStep::Sensor) {
                self.kv.set_add(keyspace::SENSORS_SEEN, sensor).await?;
                self.kv
                    .sorted_incr_by(keyspace::STATS_SENSORS, sensor, 1.0)
                    .await?;
                progress.complete(MergeStep::Sensor);
            }
        }

        if self.histograms && obs.source == ObservationSource::RawLine {
            if let Some(ttl) = obs.ttl.as_deref() {
                if progress.is_pending(MergeStep::TtlHistogram) {
                    self.kv.hash_incr_by(keyspace::DIST_TTL, ttl, 1).await?;
                    progress.complete(MergeStep::TtlHistogram);
                }
            }
            if let Some(class) = obs.class.as_deref() {
                if progress.is_pending(MergeStep::ClassHistogram) {
                    self.kv.hash_incr_by(keyspace::DIST_CLASS, class, 1).await?;
                    progress.complete(MergeStep::ClassHistogram);
                }
            }
            if progress.is_pending(MergeStep::TypeHistogram) {
                self.kv
                    .hash_incr_by(keyspace::DIST_TYPE, &obs.type_code.to_string(), 1)
                    .await?;
                progress.complete(MergeStep::TypeHistogram);
            }
        }

        Ok(())
    }

    pub async fn first_seen(
        &self,
        name: &str,
        value: &str,
        code: u16,
    ) -> Result<Option<u64>, DomainError> {
        self.read_number(&keyspace::first_seen(name, value, code))
            .await
    }

    pub async fn last_seen(
        &self,
        name: &str,
        value: &str,
        code: u16,
    ) -> Result<Option<u64>, DomainError> {
        self.read_number(&keyspace::last_seen(name, value, code))
            .await
    }

    pub async fn count(
        &self,
        name: &str,
        value: &str,
        code: u16,
    ) -> Result<Option<u64>, DomainError> {
        self.read_number(&keyspace::occurrences(name, value, code))
            .await
    }

    pub async fn forward_cardinality(&self, name: &str, code: u16) -> Result<u64, DomainError> {
        self.kv.set_cardinality(&keyspace::forward(name, code)).await
    }

    pub async fn forward_members(&self, name: &str, code: u16) -> Result<Vec<String>, DomainError> {
        self.kv.set_members(&keyspace::forward(name, code)).await
    }

    /// Reads the whole forward set page by page with `SSCAN`.
    ///
    /// SSCAN may return a member more than once; duplicates are dropped.
    pub async fn forward_scan(
        &self,
        name: &str,
        code: u16,
        page_size: usize,
    ) -> Result<Vec<String>, DomainError> {
        let key = keyspace::forward(name, code);
        let mut seen = rustc_hash::FxHashSet::default();
        let mut members = Vec::new();
        let mut cursor = 0u64;
        let mut pages = 0u32;

        loop {
            let (next, page) = self.kv.set_scan(&key, cursor, page_size).await?;
            pages += 1;
            for member in page {
                if seen.insert(member.clone()) {
                    members.push(member);
                }
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(key = %key, pages, members = members.len(), "Forward set scanned");
        Ok(members)
    }

    pub async fn reverse_members(
        &self,
        value: &str,
        code: u16,
    ) -> Result<Vec<String>, DomainError> {
        self.kv.set_members(&keyspace::reverse(value, code)).await
    }

    pub async fn stats(&self) -> Result<StoreStats, DomainError> {
        let processed = self
            .read_number(keyspace::STATS_PROCESSED)
            .await?
            .unwrap_or(0);

        let sensors = self
            .kv
            .sorted_rev_range_with_scores(keyspace::STATS_SENSORS)
            .await?
            .into_iter()
            .map(|(sensor_id, score)| SensorCount {
                sensor_id,
                count: if score.is_finite() && score > 0.0 {
                    score.trunc() as u64
                } else {
                    0
                },
            })
            .collect();

        Ok(StoreStats { processed, sensors })
    }

    async fn read_number(&self, key: &str) -> Result<Option<u64>, DomainError> {
        match self.kv.get(key).await? {
            None => Ok(None),
            Some(raw) => truncate_decimal(&raw)
                .map(Some)
                .ok_or_else(|| DomainError::CorruptValue {
                    key: key.to_string(),
                    value: raw,
                }),
        }
    }
}
