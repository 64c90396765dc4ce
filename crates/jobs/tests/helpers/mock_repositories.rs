#![allow(dead_code)]

use async_trait::async_trait;
use pdns_cof_application::ports::{EventQueue, KeyValueStore};
use pdns_cof_domain::DomainError;
use pdns_cof_infrastructure::store::InMemoryKeyValueStore;
use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Mock EventQueue
// ============================================================================

pub struct MockEventQueue {
    items: Mutex<VecDeque<String>>,
    dead_letters: Mutex<Vec<String>>,
    pops: AtomicU64,
    stop_when_empty: Option<CancellationToken>,
}

impl MockEventQueue {
    pub fn with_items(items: &[&str]) -> Self {
        Self {
            items: Mutex::new(items.iter().map(|s| s.to_string()).collect()),
            dead_letters: Mutex::new(Vec::new()),
            pops: AtomicU64::new(0),
            stop_when_empty: None,
        }
    }

    /// Cancels `token` the first time the queue is found empty.
    pub fn stop_when_empty(mut self, token: CancellationToken) -> Self {
        self.stop_when_empty = Some(token);
        self
    }

    pub async fn dead_letters(&self) -> Vec<String> {
        self.dead_letters.lock().await.clone()
    }

    pub fn pop_count(&self) -> u64 {
        self.pops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventQueue for MockEventQueue {
    async fn pop(&self) -> Result<Option<String>, DomainError> {
        self.pops.fetch_add(1, Ordering::SeqCst);
        let item = self.items.lock().await.pop_front();
        if item.is_none() {
            if let Some(token) = &self.stop_when_empty {
                token.cancel();
            }
        }
        Ok(item)
    }

    async fn dead_letter(&self, raw: &str) -> Result<(), DomainError> {
        self.dead_letters.lock().await.push(raw.to_string());
        Ok(())
    }
}

// ============================================================================
// Flaky KeyValueStore
// ============================================================================

/// In-memory store whose next `n` calls fail with `StoreUnavailable`, or
/// whose next `n` writes to one key do.
pub struct FlakyKeyValueStore {
    inner: InMemoryKeyValueStore,
    failures_left: AtomicU32,
    failing_key: StdMutex<Option<(String, u32)>>,
}

impl FlakyKeyValueStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryKeyValueStore::new(),
            failures_left: AtomicU32::new(0),
            failing_key: StdMutex::new(None),
        }
    }

    pub fn fail_next(&self, n: u32) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    pub fn fail_key(&self, key: &str, n: u32) {
        *self.failing_key.lock().unwrap() = Some((key.to_string(), n));
    }

    /// Reads straight from the backing store, never failing.
    pub async fn stored(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.unwrap()
    }

    fn check_key(&self, key: &str) -> Result<(), DomainError> {
        self.check()?;
        let mut failing_key = self.failing_key.lock().unwrap();
        match failing_key.as_mut() {
            Some((target, left)) if target.as_str() == key && *left > 0 => {
                *left -= 1;
                Err(DomainError::StoreUnavailable("connection reset".to_string()))
            }
            _ => Ok(()),
        }
    }

    fn check(&self) -> Result<(), DomainError> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            Err(DomainError::StoreUnavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.check_key(key)?;
        self.inner.set(key, value).await
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, DomainError> {
        self.check_key(key)?;
        self.inner.set_if_absent(key, value).await
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
        self.check_key(key)?;
        self.inner.incr_by(key, delta).await
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        self.check_key(key)?;
        self.inner.set_add(key, member).await
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        self.check()?;
        self.inner.set_members(key).await
    }

    async fn set_cardinality(&self, key: &str) -> Result<u64, DomainError> {
        self.check()?;
        self.inner.set_cardinality(key).await
    }

    async fn set_scan(
        &self,
        key: &str,
        cursor: u64,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError> {
        self.check()?;
        self.inner.set_scan(key, cursor, count).await
    }

    async fn hash_incr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, DomainError> {
        self.check_key(key)?;
        self.inner.hash_incr_by(key, field, delta).await
    }

    async fn sorted_incr_by(
        &self,
        key: &str,
        member: &str,
        delta: f64,
    ) -> Result<f64, DomainError> {
        self.check_key(key)?;
        self.inner.sorted_incr_by(key, member, delta).await
    }

    async fn sorted_rev_range_with_scores(
        &self,
        key: &str,
    ) -> Result<Vec<(String, f64)>, DomainError> {
        self.check()?;
        self.inner.sorted_rev_range_with_scores(key).await
    }
}
