use crate::IngestionJob;
use std::sync::Arc;
use tracing::info;

/// Starts the background jobs registered through the builder.
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_ingestion(IngestionJob::new(queue, ingest).with_cancellation(token))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    ingestion: Option<IngestionJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self { ingestion: None }
    }

    pub fn with_ingestion(mut self, job: IngestionJob) -> Self {
        self.ingestion = Some(job);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.ingestion {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
