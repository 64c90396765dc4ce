pub mod health;
pub mod info;
pub mod query;

pub use health::health_check;
pub use info::get_info;
pub use query::{full_query, query};
