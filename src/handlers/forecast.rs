use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info, instrument, trace, warn};

use crate::charts::{self, FanChart};
use crate::pipeline::{self, RunSummary};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Run the forecast pipeline
///
/// Writes the edited scenario back in canonical form, invokes the external
/// forecasting process and reloads the forecast result. The call blocks
/// until the process exits; concurrent runs serialize behind the dataset
/// lock. On a non-zero exit the previous forecast is left intact.
#[utoipa::path(
    post,
    path = "/api/v1/forecast/run",
    tag = "forecast",
    responses(
        (status = 200, description = "Forecast generated", body = ApiResponseRunSummary),
        (status = 500, description = "Pipeline failed", body = ErrorResponse),
    )
)]
#[instrument(skip(state))]
pub async fn run_forecast(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RunSummary>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering run_forecast function");

    // Hold the write half for the whole run: the pipeline is the sole
    // mutator of the scenario and forecast files.
    let mut datasets = state.datasets.write().await;
    let summary = pipeline::run_forecast(&state.config, &mut datasets)
        .await
        .map_err(|e| {
            error!("Forecast run failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Forecast run failed: {}", e),
                    code: "PIPELINE_ERROR".to_string(),
                    success: false,
                }),
            )
        })?;

    info!(
        "Forecast run succeeded: {} prediction rows",
        summary.prediction_rows
    );
    Ok(Json(ApiResponse {
        data: summary,
        message: "Forecast generated successfully".to_string(),
        success: true,
    }))
}

/// Get the forecast fan chart
///
/// Splits the loaded forecast result by its discriminator and returns the
/// actual line, the prediction line and the confidence band traces.
#[utoipa::path(
    get,
    path = "/api/v1/forecast/chart",
    tag = "forecast",
    responses(
        (status = 200, description = "Fan chart payload", body = ApiResponseFanChart),
        (status = 404, description = "No forecast has been generated yet", body = ErrorResponse),
    )
)]
#[instrument(skip(state))]
pub async fn get_forecast_chart(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FanChart>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_forecast_chart function");
    let datasets = state.datasets.read().await;
    let forecast = datasets.forecast.as_ref().ok_or_else(|| {
        warn!("Forecast chart requested before any run");
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No forecast has been generated yet".to_string(),
                code: "FORECAST_ERROR".to_string(),
                success: false,
            }),
        )
    })?;

    let chart = charts::fan_chart(forecast);
    Ok(Json(ApiResponse {
        data: chart,
        message: "Forecast chart built successfully".to_string(),
        success: true,
    }))
}
