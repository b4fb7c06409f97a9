use crate::handlers::{
    export::download_forecast,
    forecast::{get_forecast_chart, run_forecast},
    health::health_check,
    indicators::get_indicators_chart,
    scenario::{get_scenario, patch_scenario_cell},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware.
///
/// The timeout covers the forecast run, which blocks on the external
/// process for its full duration.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Historical view
        .route("/api/v1/indicators/chart", get(get_indicators_chart))
        // Scenario view and editing
        .route("/api/v1/scenario", get(get_scenario))
        .route("/api/v1/scenario/cells", patch(patch_scenario_cell))
        // Forecast pipeline and fan chart
        .route("/api/v1/forecast/run", post(run_forecast))
        .route("/api/v1/forecast/chart", get(get_forecast_chart))
        // Export
        .route("/api/v1/forecast/download", get(download_forecast))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(300)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
