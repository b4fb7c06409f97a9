use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument, trace, warn};

use crate::schemas::{AppState, ErrorResponse};

/// Fixed download name of the export artifact.
const DOWNLOAD_NAME: &str = "previsao.csv";

/// Download the forecast result
///
/// Streams the on-disk delimited forecast file verbatim under its fixed
/// download name. No transformation is applied.
#[utoipa::path(
    get,
    path = "/api/v1/forecast/download",
    tag = "export",
    responses(
        (status = 200, description = "Forecast CSV", content_type = "text/csv"),
        (status = 404, description = "Export file not found", body = ErrorResponse),
    )
)]
#[instrument(skip(state))]
pub async fn download_forecast(
    State(state): State<AppState>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering download_forecast function");
    let path = state.config.paths().forecast_csv();

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        warn!("Export file unavailable at {:?}: {}", path, e);
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Export file not found: {}", e),
                code: "EXPORT_ERROR".to_string(),
                success: false,
            }),
        )
    })?;
    debug!(path = ?path, "Streaming export file");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_NAME}\""),
            ),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
