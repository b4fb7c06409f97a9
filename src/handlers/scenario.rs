use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{debug, info, instrument, trace, warn};

use crate::charts::{self, ScenarioGrid};
use crate::scenario::{CellValue, ScenarioError};
use crate::schemas::{ApiResponse, AppState, CellEditRequest, ErrorResponse};

/// Get the scenario grid
///
/// Returns the editable scenario table in display form: human-readable
/// column labels, MM/YYYY periods and two-decimal values.
#[utoipa::path(
    get,
    path = "/api/v1/scenario",
    tag = "scenario",
    responses(
        (status = 200, description = "Scenario grid in display form", body = ApiResponseScenarioGrid),
    )
)]
#[instrument(skip(state))]
pub async fn get_scenario(State(state): State<AppState>) -> Json<ApiResponse<ScenarioGrid>> {
    trace!("Entering get_scenario function");
    let datasets = state.datasets.read().await;
    let grid = charts::scenario_grid(&datasets.scenario);
    debug!(rows = grid.rows.len(), "Scenario grid built");

    Json(ApiResponse {
        data: grid,
        message: "Scenario retrieved successfully".to_string(),
        success: true,
    })
}

/// Edit one scenario cell
///
/// Coerces the raw text against the declared column schema: indicator
/// columns parse to floats, the period column passes through as a string.
/// Malformed numeric text is rejected, never defaulted.
#[utoipa::path(
    patch,
    path = "/api/v1/scenario/cells",
    tag = "scenario",
    request_body = CellEditRequest,
    responses(
        (status = 200, description = "Cell updated", body = ApiResponseCellValue),
        (status = 400, description = "Value could not be coerced", body = ErrorResponse),
        (status = 404, description = "Cell out of range", body = ErrorResponse),
    )
)]
#[instrument(skip(state))]
pub async fn patch_scenario_cell(
    State(state): State<AppState>,
    Json(request): Json<CellEditRequest>,
) -> Result<Json<ApiResponse<CellValue>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering patch_scenario_cell function");
    debug!("Editing cell: {:?}", request);

    let mut datasets = state.datasets.write().await;
    let value = datasets
        .scenario
        .apply_edit(request.row, request.column, &request.value)
        .map_err(|e| {
            warn!("Cell edit rejected: {}", e);
            let status = match e {
                ScenarioError::CellOutOfRange { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "SCENARIO_ERROR".to_string(),
                    success: false,
                }),
            )
        })?;

    info!(
        "Cell updated: row={}, column={}",
        request.row, request.column
    );
    Ok(Json(ApiResponse {
        data: value,
        message: "Cell updated successfully".to_string(),
        success: true,
    }))
}
