pub mod info;

pub use info::{InfoResponse, SensorResponse};
