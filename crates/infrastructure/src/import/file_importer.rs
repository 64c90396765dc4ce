use pdns_cof_application::use_cases::IngestObservationUseCase;
use pdns_cof_domain::{CofInput, DomainError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Ndjson,
    JsonArray,
    Lines,
}

impl ImportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportFormat::Ndjson => "ndjson",
            ImportFormat::JsonArray => "json-array",
            ImportFormat::Lines => "lines",
        }
    }
}

impl FromStr for ImportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ndjson" | "jsonl" => Ok(ImportFormat::Ndjson),
            "json-array" | "json" => Ok(ImportFormat::JsonArray),
            "lines" | "raw" => Ok(ImportFormat::Lines),
            other => Err(format!(
                "unknown import format '{other}' (expected ndjson, json-array or lines)"
            )),
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub accepted: u64,
    pub rejected: u64,
    pub failed: u64,
}

impl ImportSummary {
    fn record(&mut self, position: usize, result: Result<(), DomainError>) {
        match result {
            Ok(()) => self.accepted += 1,
            Err(e) if e.is_rejection() => {
                debug!(position, error = %e, "Record rejected");
                self.rejected += 1;
            }
            Err(e) => {
                warn!(position, error = %e, "Record could not be stored");
                self.failed += 1;
            }
        }
    }
}

/// Feeds a file through the ingest use case, one record at a time.
pub struct FileImporter {
    ingest: Arc<IngestObservationUseCase>,
}

impl FileImporter {
    pub fn new(ingest: Arc<IngestObservationUseCase>) -> Self {
        Self { ingest }
    }

    pub async fn import(
        &self,
        path: impl AsRef<Path>,
        format: ImportFormat,
    ) -> Result<ImportSummary, DomainError> {
        let path = path.as_ref();
        info!(path = %path.display(), %format, "Starting import");

        let summary = match format {
            ImportFormat::JsonArray => self.import_array(path).await?,
            ImportFormat::Ndjson | ImportFormat::Lines => self.import_lines(path, format).await?,
        };

        info!(
            path = %path.display(),
            accepted = summary.accepted,
            rejected = summary.rejected,
            failed = summary.failed,
            "Import finished"
        );
        Ok(summary)
    }

    async fn import_lines(
        &self,
        path: &Path,
        format: ImportFormat,
    ) -> Result<ImportSummary, DomainError> {
        let file = File::open(path).await.map_err(|e| io_error(path, e))?;
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut summary = ImportSummary::default();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| io_error(path, e))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            // A bad line is one rejected record, not a failed import.
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim_end_matches(['\n', '\r']),
                Err(e) => {
                    summary.record(
                        line_no,
                        Err(DomainError::MalformedRecord(format!("invalid UTF-8: {e}"))),
                    );
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let result = match format {
                ImportFormat::Ndjson => self.ingest.execute_cof_json(line).await,
                _ => self.ingest.execute_raw(line).await,
            };
            summary.record(line_no, result.map(|_| ()));
        }

        Ok(summary)
    }

    async fn import_array(&self, path: &Path) -> Result<ImportSummary, DomainError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| io_error(path, e))?;
        let items: Vec<serde_json::Value> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::MalformedRecord(format!("{}: not a JSON array: {e}", path.display()))
        })?;

        let mut summary = ImportSummary::default();
        for (index, item) in items.into_iter().enumerate() {
            let result = match serde_json::from_value::<CofInput>(item) {
                Ok(input) => self.ingest.execute_cof(input).await.map(|_| ()),
                Err(e) => Err(DomainError::MalformedRecord(format!("invalid COF object: {e}"))),
            };
            summary.record(index, result);
        }

        Ok(summary)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> DomainError {
    DomainError::IoError(format!("{}: {}", path.display(), e))
}
