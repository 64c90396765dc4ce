pub mod import;
pub mod queue;
pub mod registry;
pub mod store;
