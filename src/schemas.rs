use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::{OpenApi, ToSchema};

use crate::charts::{FanChart, IndicatorPanels, Panel, ScenarioGrid, Trace};
use crate::config::AppConfig;
use crate::pipeline::RunSummary;
use crate::scenario::CellValue;
use crate::store::Datasets;

/// Application state shared across handlers.
///
/// The three datasets are explicit session state behind a single lock:
/// readers render from a snapshot, and the pipeline takes the write half
/// for the whole run, so runs serialize and there is exactly one writer.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Environment-driven configuration
    pub config: AppConfig,
    /// The loaded datasets of this session
    pub datasets: Arc<RwLock<Datasets>>,
}

impl AppState {
    pub fn new(config: AppConfig, datasets: Datasets) -> Self {
        Self {
            config,
            datasets: Arc::new(RwLock::new(datasets)),
        }
    }
}

/// A single scenario cell edit: raw text addressed by grid position.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CellEditRequest {
    /// Zero-based row index into the scenario grid
    pub row: usize,
    /// Zero-based column index into the scenario grid
    pub column: usize,
    /// Raw text of the edited cell
    pub value: String,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
#[aliases(
    ApiResponseIndicatorPanels = ApiResponse<IndicatorPanels>,
    ApiResponseScenarioGrid = ApiResponse<ScenarioGrid>,
    ApiResponseFanChart = ApiResponse<FanChart>,
    ApiResponseRunSummary = ApiResponse<RunSummary>,
    ApiResponseCellValue = ApiResponse<CellValue>
)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Data directory status
    pub data_dir: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::indicators::get_indicators_chart,
        crate::handlers::scenario::get_scenario,
        crate::handlers::scenario::patch_scenario_cell,
        crate::handlers::forecast::run_forecast,
        crate::handlers::forecast::get_forecast_chart,
        crate::handlers::export::download_forecast,
    ),
    components(
        schemas(
            ApiResponseIndicatorPanels,
            ApiResponseScenarioGrid,
            ApiResponseFanChart,
            ApiResponseRunSummary,
            ApiResponseCellValue,
            ErrorResponse,
            HealthResponse,
            CellEditRequest,
            IndicatorPanels,
            Panel,
            ScenarioGrid,
            FanChart,
            Trace,
            RunSummary,
            CellValue,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "indicators", description = "Historical indicator chart endpoints"),
        (name = "scenario", description = "Scenario table view and editing"),
        (name = "forecast", description = "Forecast pipeline and fan chart"),
        (name = "export", description = "Forecast result download"),
    ),
    info(
        title = "Previsor API",
        description = "Macroeconomic forecast dashboard - scenario editing, forecast pipeline and chart data",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
