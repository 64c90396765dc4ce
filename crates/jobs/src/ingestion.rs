use pdns_cof_application::ports::EventQueue;
use pdns_cof_application::services::MergeProgress;
use pdns_cof_application::use_cases::IngestObservationUseCase;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Snapshot of what the ingestion loop has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionCounters {
    pub processed: u64,
    pub rejected: u64,
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    processed: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

enum Outcome {
    Merged,
    Rejected,
    Failed,
}

/// Drains the D4 analyzer queue into the aggregation store.
///
/// One item at a time: pop, normalize, merge. Store outages are retried
/// with the idle backoff, picking the merge up where it stopped; an item
/// that still cannot be stored goes to the dead-letter list (when enabled)
/// and the loop moves on.
pub struct IngestionJob {
    queue: Arc<dyn EventQueue>,
    ingest: Arc<IngestObservationUseCase>,
    idle_backoff: Duration,
    max_retries: u32,
    dead_letter: bool,
    counters: Counters,
    shutdown: CancellationToken,
}

impl IngestionJob {
    pub fn new(queue: Arc<dyn EventQueue>, ingest: Arc<IngestObservationUseCase>) -> Self {
        Self {
            queue,
            ingest,
            idle_backoff: Duration::from_secs(1),
            max_retries: 3,
            dead_letter: true,
            counters: Counters::default(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_idle_backoff(mut self, backoff: Duration) -> Self {
        self.idle_backoff = backoff;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_dead_letter(mut self, enabled: bool) -> Self {
        self.dead_letter = enabled;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn counters(&self) -> IngestionCounters {
        IngestionCounters {
            processed: self.counters.processed.load(Ordering::Relaxed),
            rejected: self.counters.rejected.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    pub async fn start(self: Arc<Self>) {
        info!("Starting ingestion background job");
        tokio::spawn(async move {
            self.run().await;
        });
    }

    /// Runs in the current task until the cancellation token fires.
    pub async fn run(&self) -> IngestionCounters {
        info!(
            idle_backoff_ms = self.idle_backoff.as_millis() as u64,
            max_retries = self.max_retries,
            dead_letter = self.dead_letter,
            "Ingestion loop started"
        );

        while !self.shutdown.is_cancelled() {
            let raw = match self.queue.pop().await {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    self.idle().await;
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "Queue pop failed");
                    self.idle().await;
                    continue;
                }
            };

            let counter = match self.process(&raw).await {
                Outcome::Merged => &self.counters.processed,
                Outcome::Rejected => &self.counters.rejected,
                Outcome::Failed => &self.counters.failed,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }

        let counters = self.counters();
        info!(
            processed = counters.processed,
            rejected = counters.rejected,
            failed = counters.failed,
            "IngestionJob: shutting down"
        );
        counters
    }

    async fn process(&self, raw: &str) -> Outcome {
        let observation = match self.ingest.normalize_raw(raw) {
            Ok(observation) => observation,
            Err(e) => {
                debug!(error = %e, "Record rejected");
                return Outcome::Rejected;
            }
        };

        // Retries resume after the last write that landed.
        let mut progress = MergeProgress::default();
        let mut attempt = 0u32;
        loop {
            match self.ingest.merge(&observation, &mut progress).await {
                Ok(()) => return Outcome::Merged,
                Err(e) if e.is_rejection() => {
                    debug!(error = %e, "Record rejected");
                    return Outcome::Rejected;
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        error = %e,
                        attempt,
                        max_retries = self.max_retries,
                        partial = progress.is_started(),
                        "Merge failed, retrying"
                    );
                    if !self.idle().await {
                        break;
                    }
                }
                Err(e) => {
                    error!(error = %e, attempts = attempt + 1, "Merge failed, giving up");
                    break;
                }
            }
        }

        if self.dead_letter {
            if let Err(e) = self.queue.dead_letter(raw).await {
                error!(error = %e, "Dead-letter push failed, record lost");
            }
        }
        Outcome::Failed
    }

    /// Sleeps for the idle backoff. Returns false if shutdown was requested.
    async fn idle(&self) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => false,
            _ = tokio::time::sleep(self.idle_backoff) => true,
        }
    }
}
