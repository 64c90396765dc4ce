use async_trait::async_trait;
use pdns_cof_application::ports::KeyValueStore;
use pdns_cof_domain::config::StoreConfig;
use pdns_cof_domain::DomainError;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{error, info, instrument};

fn store_error(e: redis::RedisError) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

/// Aggregation store backed by a Redis-compatible server (Redis, kvrocks).
///
/// `ConnectionManager` reconnects on its own, so a dropped connection turns
/// into `StoreUnavailable` for in-flight calls and heals for later ones.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    conn: ConnectionManager,
}

impl RedisKeyValueStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self, DomainError> {
        let url = config.url();
        let client = redis::Client::open(url.as_str()).map_err(store_error)?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to connect to store");
            store_error(e)
        })?;
        info!(url = %url, "Connected to aggregation store");
        Ok(Self { conn })
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.conn().get(key).await.map_err(store_error)
    }

    #[instrument(skip(self))]
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.conn().set(key, value).await.map_err(store_error)
    }

    #[instrument(skip(self))]
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, DomainError> {
        self.conn().set_nx(key, value).await.map_err(store_error)
    }

    #[instrument(skip(self))]
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
        self.conn().incr(key, delta).await.map_err(store_error)
    }

    #[instrument(skip(self))]
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let added: i64 = self.conn().sadd(key, member).await.map_err(store_error)?;
        Ok(added > 0)
    }

    #[instrument(skip(self))]
    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        self.conn().smembers(key).await.map_err(store_error)
    }

    #[instrument(skip(self))]
    async fn set_cardinality(&self, key: &str) -> Result<u64, DomainError> {
        self.conn().scard(key).await.map_err(store_error)
    }

    #[instrument(skip(self))]
    async fn set_scan(
        &self,
        key: &str,
        cursor: u64,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError> {
        let mut conn = self.conn();
        let page: (u64, Vec<String>) = redis::cmd("SSCAN")
            .arg(key)
            .arg(cursor)
            .arg("COUNT")
            .arg(count.max(1))
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn hash_incr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, DomainError> {
        self.conn().hincr(key, field, delta).await.map_err(store_error)
    }

    #[instrument(skip(self))]
    async fn sorted_incr_by(
        &self,
        key: &str,
        member: &str,
        delta: f64,
    ) -> Result<f64, DomainError> {
        self.conn().zincr(key, member, delta).await.map_err(store_error)
    }

    #[instrument(skip(self))]
    async fn sorted_rev_range_with_scores(
        &self,
        key: &str,
    ) -> Result<Vec<(String, f64)>, DomainError> {
        self.conn()
            .zrevrange_withscores(key, 0, -1)
            .await
            .map_err(store_error)
    }
}
