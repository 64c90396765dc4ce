use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Unknown record type: {0}")]
    UnknownType(String),

    #[error("Record type {0} is not supported")]
    UnsupportedType(u16),

    #[error("Excluded by policy: {0}")]
    ExcludedByPolicy(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Corrupt value at key {key}: {value}")]
    CorruptValue { key: String, value: String },

    #[error("Queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("Invalid record type registry: {0}")]
    InvalidRegistry(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// True for the rejections a normalizer produces; these drop one record
    /// and never indicate a backend problem.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedRecord(_)
                | DomainError::UnknownType(_)
                | DomainError::UnsupportedType(_)
                | DomainError::ExcludedByPolicy(_)
        )
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::StoreUnavailable(_) | DomainError::QueueUnavailable(_)
        )
    }
}
