use crate::{dto::InfoResponse, state::AppState};
use axum::{extract::State, Json};
use tracing::{debug, error, instrument};

#[instrument(skip(state), name = "api_get_info")]
pub async fn get_info(State(state): State<AppState>) -> Json<InfoResponse> {
    match state.get_info.execute().await {
        Ok(stats) => {
            debug!(
                processed = stats.processed,
                sensors = stats.sensors.len(),
                "Store statistics retrieved"
            );
            Json(InfoResponse::new(&state.version, stats))
        }
        Err(e) => {
            error!(error = %e, "Failed to retrieve store statistics");
            Json(InfoResponse::empty(&state.version))
        }
    }
}
