use axum::{extract::State, response::Json};
use tracing::{debug, instrument, trace};

use crate::charts::{self, IndicatorPanels};
use crate::schemas::{ApiResponse, AppState};

/// Get the historical indicator chart
///
/// Returns the small-multiple line panel payload for the five macro
/// indicators, built from the immutable indicator series.
#[utoipa::path(
    get,
    path = "/api/v1/indicators/chart",
    tag = "indicators",
    responses(
        (status = 200, description = "Historical chart payload", body = ApiResponseIndicatorPanels),
    )
)]
#[instrument(skip(state))]
pub async fn get_indicators_chart(
    State(state): State<AppState>,
) -> Json<ApiResponse<IndicatorPanels>> {
    trace!("Entering get_indicators_chart function");
    let datasets = state.datasets.read().await;
    let panels = charts::historical_panels(&datasets.indicators);
    debug!(points = datasets.indicators.len(), "Historical panels built");

    Json(ApiResponse {
        data: panels,
        message: "Historical chart built successfully".to_string(),
        success: true,
    })
}
