pub mod event_queue;
pub mod key_value_store;

pub use event_queue::EventQueue;
pub use key_value_store::KeyValueStore;
