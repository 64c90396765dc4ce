pub mod memory_store;
pub mod redis_store;

pub use memory_store::InMemoryKeyValueStore;
pub use redis_store::RedisKeyValueStore;
