use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::scenario::ScenarioError;
use crate::store::{self, Datasets, ForecastKey, StoreError};

/// Error types for the forecast pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error reading or writing a dataset file
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The edited scenario could not be canonicalized
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// No forecast command is configured
    #[error("Forecast command is empty")]
    EmptyCommand,

    /// The external forecasting process could not be started
    #[error("Failed to spawn forecast command '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The external forecasting process exited with a failure status.
    /// The previous forecast file is left intact in this case.
    #[error("Forecast command '{command}' failed with status {code:?}: {stderr}")]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Summary of a completed forecast run, returned to the caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RunSummary {
    /// Rows written to the canonical scenario file
    pub scenario_rows: usize,
    /// Historical rows in the reloaded forecast
    pub actual_rows: usize,
    /// Forecasted rows in the reloaded forecast
    pub prediction_rows: usize,
    /// Wall-clock duration of the whole run in milliseconds
    pub elapsed_ms: u64,
}

/// Run the forecast pipeline, strictly in order: canonicalize the edited
/// scenario, overwrite the scenario file, invoke the external forecasting
/// process, reload the forecast result. The process is invoked with the
/// data directory as its working directory.
///
/// A non-zero exit aborts the run before the reload, so the previously
/// loaded forecast stays visible. The sequence is not transactional: a
/// process failure leaves the scenario file already updated and the
/// forecast stale.
#[instrument(skip(config, datasets))]
pub async fn run_forecast(
    config: &AppConfig,
    datasets: &mut Datasets,
) -> Result<RunSummary, PipelineError> {
    let started = Instant::now();
    let paths = config.paths();

    info!("Forecast run started: canonicalizing scenario");
    let canonical = datasets.scenario.to_canonical()?;
    let scenario_rows = canonical.len();

    info!(rows = scenario_rows, "Writing canonical scenario");
    store::write_scenario(&paths.scenario(), &canonical)?;

    let (program, args) = config
        .forecast_command
        .split_first()
        .ok_or(PipelineError::EmptyCommand)?;
    let command_line = config.forecast_command.join(" ");
    info!(command = %command_line, "Invoking external forecasting process");
    // The process runs inside the data directory, so a script using
    // relative file names reads and writes the same files we do.
    let output = Command::new(program)
        .args(args)
        .current_dir(&config.data_dir)
        .output()
        .await
        .map_err(|source| PipelineError::Spawn {
            command: command_line.clone(),
            source,
        })?;
    debug!(status = ?output.status, "Forecasting process exited");
    if !output.stderr.is_empty() {
        warn!(
            stderr = %String::from_utf8_lossy(&output.stderr),
            "Forecasting process wrote to stderr"
        );
    }
    if !output.status.success() {
        let err = PipelineError::ProcessFailed {
            command: command_line,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        error!(%err, "Forecast run aborted; previous forecast left intact");
        return Err(err);
    }

    info!("Reloading forecast result");
    let forecast = store::load_forecast(&paths.forecast())?;
    let actual_rows = forecast
        .rows
        .iter()
        .filter(|r| r.key == ForecastKey::Actual)
        .count();
    let prediction_rows = forecast.rows.len() - actual_rows;
    datasets.forecast = Some(forecast);

    let summary = RunSummary {
        scenario_rows,
        actual_rows,
        prediction_rows,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        scenario_rows = summary.scenario_rows,
        actual_rows = summary.actual_rows,
        prediction_rows = summary.prediction_rows,
        elapsed_ms = summary.elapsed_ms,
        "Forecast run completed"
    );
    Ok(summary)
}
