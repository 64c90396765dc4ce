//! Bulk loading of passive DNS data from files.
//!
//! Three layouts are understood:
//! - `ndjson`: one COF JSON object per line
//! - `json-array`: a single JSON array of COF objects
//! - `lines`: raw `||`-separated sensor lines, COF objects allowed in between

pub mod file_importer;

pub use file_importer::{FileImporter, ImportFormat, ImportSummary};
