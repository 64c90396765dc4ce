use pdns_cof_application::ports::KeyValueStore;
use pdns_cof_domain::config::StoreConfig;
use pdns_cof_infrastructure::store::{InMemoryKeyValueStore, RedisKeyValueStore};
use std::sync::Arc;
use tracing::{error, warn};

pub async fn connect_store(
    config: &StoreConfig,
    in_memory: bool,
) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if in_memory {
        warn!("Using the in-memory store; nothing will be persisted");
        return Ok(Arc::new(InMemoryKeyValueStore::new()));
    }

    let store = RedisKeyValueStore::connect(config).await.map_err(|e| {
        error!(error = %e, "Failed to initialize aggregation store");
        anyhow::anyhow!(e)
    })?;
    Ok(Arc::new(store))
}
