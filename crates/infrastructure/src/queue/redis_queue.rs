use async_trait::async_trait;
use pdns_cof_application::ports::EventQueue;
use pdns_cof_domain::config::QueueConfig;
use pdns_cof_domain::{keyspace, DomainError};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{error, info, instrument};

fn queue_error(e: redis::RedisError) -> DomainError {
    DomainError::QueueUnavailable(e.to_string())
}

/// The analyzer list a D4 server fills for one registered analyzer UUID.
pub struct RedisEventQueue {
    conn: ConnectionManager,
    queue: String,
    failed: String,
}

impl RedisEventQueue {
    pub async fn connect(config: &QueueConfig) -> Result<Self, DomainError> {
        let url = config.url();
        let client = redis::Client::open(url.as_str()).map_err(queue_error)?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to connect to D4 server");
            queue_error(e)
        })?;

        let queue = keyspace::analyzer_queue(&config.uuid);
        info!(url = %url, queue = %queue, "Connected to D4 analyzer queue");

        Ok(Self {
            conn,
            failed: keyspace::dead_letter_queue(&config.uuid),
            queue,
        })
    }
}

#[async_trait]
impl EventQueue for RedisEventQueue {
    async fn pop(&self) -> Result<Option<String>, DomainError> {
        let mut conn = self.conn.clone();
        conn.rpop(&self.queue, None).await.map_err(queue_error)
    }

    #[instrument(skip(self, raw), fields(queue = %self.failed))]
    async fn dead_letter(&self, raw: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.lpush(&self.failed, raw).await.map_err(queue_error)?;
        Ok(())
    }
}
