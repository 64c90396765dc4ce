pub mod config;
pub mod logging;
pub mod shutdown;
pub mod store;

pub use config::{load_config, log_config};
pub use logging::init_logging;
pub use shutdown::shutdown_on_signal;
pub use store::connect_store;
