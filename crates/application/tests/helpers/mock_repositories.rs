#![allow(dead_code)]

use async_trait::async_trait;
use pdns_cof_application::ports::KeyValueStore;
use pdns_cof_application::services::{AggregationStore, QueryEngine};
use pdns_cof_domain::config::QueryConfig;
use pdns_cof_domain::{CounterPolicy, DomainError, RecordTypeRegistry};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Mock KeyValueStore
// ============================================================================

#[derive(Debug, Clone)]
enum MockValue {
    Str(String),
    Set(BTreeSet<String>),
    Hash(HashMap<String, i64>),
    Sorted(HashMap<String, f64>),
}

pub struct MockKeyValueStore {
    data: Arc<RwLock<HashMap<String, MockValue>>>,
    should_fail: AtomicBool,
    scan_calls: AtomicU64,
}

impl MockKeyValueStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            should_fail: AtomicBool::new(false),
            scan_calls: AtomicU64::new(0),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn scan_calls(&self) -> u64 {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub async fn raw_string(&self, key: &str) -> Option<String> {
        match self.data.read().await.get(key) {
            Some(MockValue::Str(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub async fn members(&self, key: &str) -> Vec<String> {
        match self.data.read().await.get(key) {
            Some(MockValue::Set(s)) => s.iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub async fn hash_field(&self, key: &str, field: &str) -> Option<i64> {
        match self.data.read().await.get(key) {
            Some(MockValue::Hash(h)) => h.get(field).copied(),
            _ => None,
        }
    }

    pub async fn has_key(&self, key: &str) -> bool {
        self.data.read().await.contains_key(key)
    }

    pub async fn put_string(&self, key: &str, value: &str) {
        self.data
            .write()
            .await
            .insert(key.to_string(), MockValue::Str(value.to_string()));
    }

    pub async fn put_member(&self, key: &str, member: &str) {
        let mut data = self.data.write().await;
        if let MockValue::Set(s) = data
            .entry(key.to_string())
            .or_insert_with(|| MockValue::Set(BTreeSet::new()))
        {
            s.insert(member.to_string());
        }
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable("mock store down".to_string()));
        }
        Ok(())
    }

    fn wrong_type(key: &str) -> DomainError {
        DomainError::StoreUnavailable(format!("WRONGTYPE {key}"))
    }
}

impl Default for MockKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check()?;
        Ok(self.raw_string(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.check()?;
        self.put_string(key, value).await;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, DomainError> {
        self.check()?;
        let mut data = self.data.write().await;
        if data.contains_key(key) {
            return Ok(false);
        }
        data.insert(key.to_string(), MockValue::Str(value.to_string()));
        Ok(true)
    }

    async fn incr_by(&self, key: &str, amount: i64) -> Result<i64, DomainError> {
        self.check()?;
        let mut data = self.data.write().await;
        let current = match data.get(key) {
            None => 0,
            Some(MockValue::Str(s)) => s.parse::<i64>().map_err(|_| Self::wrong_type(key))?,
            Some(_) => return Err(Self::wrong_type(key)),
        };
        let next = current + amount;
        data.insert(key.to_string(), MockValue::Str(next.to_string()));
        Ok(next)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        self.check()?;
        let mut data = self.data.write().await;
        match data
            .entry(key.to_string())
            .or_insert_with(|| MockValue::Set(BTreeSet::new()))
        {
            MockValue::Set(s) => Ok(s.insert(member.to_string())),
            _ => Err(Self::wrong_type(key)),
        }
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        self.check()?;
        Ok(self.members(key).await)
    }

    async fn set_cardinality(&self, key: &str) -> Result<u64, DomainError> {
        self.check()?;
        Ok(self.members(key).await.len() as u64)
    }

    async fn set_scan(
        &self,
        key: &str,
        cursor: u64,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError> {
        self.check()?;
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        let members = self.members(key).await;
        let start = cursor as usize;
        let end = (start + count.max(1)).min(members.len());
        let page = members.get(start..end).map(|p| p.to_vec()).unwrap_or_default();
        let next = if end >= members.len() { 0 } else { end as u64 };
        Ok((next, page))
    }

    async fn hash_incr_by(
        &self,
        key: &str,
        field: &str,
        amount: i64,
    ) -> Result<i64, DomainError> {
        self.check()?;
        let mut data = self.data.write().await;
        match data
            .entry(key.to_string())
            .or_insert_with(|| MockValue::Hash(HashMap::new()))
        {
            MockValue::Hash(h) => {
                let v = h.entry(field.to_string()).or_insert(0);
                *v += amount;
                Ok(*v)
            }
            _ => Err(Self::wrong_type(key)),
        }
    }

    async fn sorted_incr_by(
        &self,
        key: &str,
        member: &str,
        amount: f64,
    ) -> Result<f64, DomainError> {
        self.check()?;
        let mut data = self.data.write().await;
        match data
            .entry(key.to_string())
            .or_insert_with(|| MockValue::Sorted(HashMap::new()))
        {
            MockValue::Sorted(z) => {
                let v = z.entry(member.to_string()).or_insert(0.0);
                *v += amount;
                Ok(*v)
            }
            _ => Err(Self::wrong_type(key)),
        }
    }

    async fn sorted_rev_range_with_scores(
        &self,
        key: &str,
    ) -> Result<Vec<(String, f64)>, DomainError> {
        self.check()?;
        let data = self.data.read().await;
        let mut entries: Vec<(String, f64)> = match data.get(key) {
            Some(MockValue::Sorted(z)) => z.iter().map(|(m, s)| (m.clone(), *s)).collect(),
            _ => Vec::new(),
        };
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        Ok(entries)
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn store_over(kv: Arc<MockKeyValueStore>) -> Arc<AggregationStore> {
    Arc::new(AggregationStore::new(kv))
}

pub fn store_with_policy(kv: Arc<MockKeyValueStore>, policy: CounterPolicy) -> Arc<AggregationStore> {
    Arc::new(AggregationStore::new(kv).with_counter_policy(policy))
}

pub fn engine_over(store: Arc<AggregationStore>, config: &QueryConfig) -> Arc<QueryEngine> {
    Arc::new(QueryEngine::with_config(
        store,
        Arc::new(RecordTypeRegistry::builtin()),
        config,
    ))
}
