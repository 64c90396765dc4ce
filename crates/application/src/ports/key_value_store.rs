use async_trait::async_trait;
use pdns_cof_domain::DomainError;

/// Narrow contract against the Redis-compatible aggregation store.
///
/// Each method maps to one native command and is atomic on its own key.
/// Sequences of calls are not transactional: two workers merging the same
/// triple may interleave between `get` and `set` of a last-seen key.
///
/// Transport failures surface as `DomainError::StoreUnavailable`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `GET key`
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// `SET key value`
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// `SET key value NX`; returns true when the key was written.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, DomainError>;

    /// `INCRBY key amount`; returns the new value.
    async fn incr_by(&self, key: &str, amount: i64) -> Result<i64, DomainError>;

    /// `SADD key member`; returns true when the member was new.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError>;

    /// `SMEMBERS key`
    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError>;

    /// `SCARD key`
    async fn set_cardinality(&self, key: &str) -> Result<u64, DomainError>;

    /// `SSCAN key cursor COUNT count`; a returned cursor of 0 ends the scan.
    async fn set_scan(
        &self,
        key: &str,
        cursor: u64,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError>;

    /// `HINCRBY key field amount`
    async fn hash_incr_by(&self, key: &str, field: &str, amount: i64)
        -> Result<i64, DomainError>;

    /// `ZINCRBY key amount member`; returns the new score.
    async fn sorted_incr_by(&self, key: &str, member: &str, amount: f64)
        -> Result<f64, DomainError>;

    /// `ZREVRANGE key 0 -1 WITHSCORES`
    async fn sorted_rev_range_with_scores(
        &self,
        key: &str,
    ) -> Result<Vec<(String, f64)>, DomainError>;
}
