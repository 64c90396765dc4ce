use async_trait::async_trait;
use pdns_cof_domain::DomainError;

/// Source of raw observation lines (the D4 analyzer list).
#[async_trait]
pub trait EventQueue: Send + Sync {
    /// Takes the oldest pending line, or `None` when the queue is empty.
    async fn pop(&self) -> Result<Option<String>, DomainError>;

    /// Parks a line that could not be stored so it can be replayed later.
    async fn dead_letter(&self, raw: &str) -> Result<(), DomainError>;
}
