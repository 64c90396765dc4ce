use crate::state::AppState;
use axum::extract::{Path, State};
use pdns_cof_domain::cof::to_ndjson;
use pdns_cof_domain::CofRecord;
use tracing::{error, info, instrument};

/// `GET /query/{term}`: records for a name, or for every name that
/// resolved to an address.
#[instrument(skip(state), name = "api_query")]
pub async fn query(State(state): State<AppState>, Path(term): Path<String>) -> String {
    info!(term = %term, "query");
    render(state.query.execute(&term).await)
}

/// `GET /fquery/{term}`: records for every name that pointed at `term`.
#[instrument(skip(state), name = "api_full_query")]
pub async fn full_query(State(state): State<AppState>, Path(term): Path<String>) -> String {
    info!(term = %term, "fquery");
    render(state.full_query.execute(&term).await)
}

fn render(records: Vec<CofRecord>) -> String {
    to_ndjson(&records).unwrap_or_else(|e| {
        error!(error = %e, "Failed to serialize records");
        String::new()
    })
}
