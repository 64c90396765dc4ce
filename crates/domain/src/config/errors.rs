use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid environment variable {name}: {value}")]
    Environment { name: String, value: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
