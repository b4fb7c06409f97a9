use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::scenario::{self, ScenarioError, ScenarioRow, ScenarioTable};

/// Days from 0001-01-01 (CE) to the 1970-01-01 epoch used by the parquet
/// date type.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Error types for the data store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error from file system operations
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] PolarsError),

    /// A stored cell did not match the declared column schema
    #[error("Schema error in column '{column}' at row {row}: {message}")]
    Schema {
        column: String,
        row: usize,
        message: String,
    },

    /// Error converting the scenario table between display and canonical form
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// File locations of the three datasets inside the data directory.
///
/// The scenario and forecast files are round-trip artifacts shared with the
/// external forecasting process, so the names are part of the contract.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub dir: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Historical indicator series (read-only reference data)
    pub fn indicators(&self) -> PathBuf {
        self.dir.join("dados.parquet")
    }

    /// Editable scenario table, overwritten on each forecast run
    pub fn scenario(&self) -> PathBuf {
        self.dir.join("cenarios.parquet")
    }

    /// Forecast result, written by the external forecasting process
    pub fn forecast(&self) -> PathBuf {
        self.dir.join("previsao.parquet")
    }

    /// Flat delimited export of the forecast result
    pub fn forecast_csv(&self) -> PathBuf {
        self.dir.join("previsao.csv")
    }
}

/// The historical macro indicator series, one value per column per month.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorSeries {
    pub dates: Vec<NaiveDate>,
    pub pib_real: Vec<f64>,
    pub inflacao: Vec<f64>,
    pub juros: Vec<f64>,
    pub cambio: Vec<f64>,
    pub producao_industrial: Vec<f64>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Discriminator distinguishing historical from forecasted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ForecastKey {
    Actual,
    Prediction,
}

/// One long-form row of the forecast result.
///
/// Confidence bounds are only present on prediction rows; the external
/// process leaves them null for actuals.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub index: NaiveDate,
    pub key: ForecastKey,
    pub value: f64,
    pub conf_lo: Option<f64>,
    pub conf_hi: Option<f64>,
}

/// The forecast result as produced by the external forecasting process.
/// Read-only on this side; fully replaced after each run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastResult {
    pub rows: Vec<ForecastRow>,
}

/// The three datasets of one session, owned by the application state.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub indicators: IndicatorSeries,
    pub scenario: ScenarioTable,
    pub forecast: Option<ForecastResult>,
}

impl Datasets {
    /// Load all datasets at session start.
    ///
    /// A missing forecast file is tolerated here (no run has happened yet);
    /// missing indicator or scenario files are startup errors.
    #[instrument(skip(paths))]
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let indicators = load_indicators(&paths.indicators())?;
        let scenario = load_scenario(&paths.scenario())?;
        let forecast = if paths.forecast().exists() {
            Some(load_forecast(&paths.forecast())?)
        } else {
            debug!("No forecast file yet at {:?}", paths.forecast());
            None
        };
        info!(
            indicator_rows = indicators.len(),
            scenario_rows = scenario.rows.len(),
            has_forecast = forecast.is_some(),
            "Datasets loaded"
        );
        Ok(Self {
            indicators,
            scenario,
            forecast,
        })
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_frame(path: &Path) -> Result<DataFrame> {
    let df = ParquetReader::new(open(path)?).finish()?;
    debug!("Read {} rows from {:?}", df.height(), path);
    Ok(df)
}

fn write_frame(mut df: DataFrame, path: &Path) -> Result<()> {
    ParquetWriter::new(create(path)?).finish(&mut df)?;
    debug!("Wrote {} rows to {:?}", df.height(), path);
    Ok(())
}

fn schema_error(column: &str, row: usize, message: impl Into<String>) -> StoreError {
    StoreError::Schema {
        column: column.to_string(),
        row,
        message: message.into(),
    }
}

/// Extract a non-null float cell.
fn f64_at(df: &DataFrame, column: &str, row: usize) -> Result<f64> {
    let value = df.column(column)?.get(row)?;
    value
        .try_extract::<f64>()
        .map_err(|e| schema_error(column, row, format!("expected a float, got {value}: {e}")))
}

/// Extract a float cell that may be null.
fn opt_f64_at(df: &DataFrame, column: &str, row: usize) -> Result<Option<f64>> {
    let value = df.column(column)?.get(row)?;
    if matches!(value, AnyValue::Null) {
        return Ok(None);
    }
    value
        .try_extract::<f64>()
        .map(Some)
        .map_err(|e| schema_error(column, row, format!("expected a float, got {value}: {e}")))
}

/// Extract a calendar-date cell.
fn date_at(df: &DataFrame, column: &str, row: usize) -> Result<NaiveDate> {
    match df.column(column)?.get(row)? {
        AnyValue::Date(days) => NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
            .ok_or_else(|| schema_error(column, row, format!("invalid date value {days}"))),
        other => Err(schema_error(
            column,
            row,
            format!("expected a date, got {other}"),
        )),
    }
}

/// Extract a string cell.
fn str_at(df: &DataFrame, column: &str, row: usize) -> Result<String> {
    match df.column(column)?.get(row)? {
        AnyValue::String(s) => Ok(s.to_string()),
        AnyValue::StringOwned(s) => Ok(s.to_string()),
        other => Err(schema_error(
            column,
            row,
            format!("expected a string, got {other}"),
        )),
    }
}

fn f64_column(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    (0..df.height()).map(|i| f64_at(df, column, i)).collect()
}

/// Load the historical indicator series.
pub fn load_indicators(path: &Path) -> Result<IndicatorSeries> {
    let df = read_frame(path)?;
    let dates = (0..df.height())
        .map(|i| date_at(&df, "ano_mes", i))
        .collect::<Result<Vec<_>>>()?;
    Ok(IndicatorSeries {
        dates,
        pib_real: f64_column(&df, "pib_real")?,
        inflacao: f64_column(&df, "inflacao")?,
        juros: f64_column(&df, "juros")?,
        cambio: f64_column(&df, "cambio")?,
        producao_industrial: f64_column(&df, "producao_industrial")?,
    })
}

/// Load the scenario table from canonical form into its display form.
pub fn load_scenario(path: &Path) -> Result<ScenarioTable> {
    let df = read_frame(path)?;
    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(ScenarioRow {
            period: scenario::format_period(date_at(&df, "ano_mes", i)?),
            pib_real: f64_at(&df, "pib_real", i)?,
            inflacao: f64_at(&df, "inflacao", i)?,
            juros: f64_at(&df, "juros", i)?,
            cambio: f64_at(&df, "cambio", i)?,
            producao_industrial: f64_at(&df, "producao_industrial", i)?,
        });
    }
    Ok(ScenarioTable::new(rows))
}

/// Build the canonical scenario frame from canonicalized rows.
fn scenario_frame(rows: &[(NaiveDate, ScenarioRow)]) -> Result<DataFrame> {
    let dates =
        DateChunked::from_naive_date("ano_mes".into(), rows.iter().map(|(date, _)| *date))
            .into_series();
    let floats = |f: fn(&ScenarioRow) -> f64| rows.iter().map(|(_, r)| f(r)).collect::<Vec<_>>();
    let columns = vec![
        dates.into_column(),
        Column::new("pib_real".into(), floats(|r| r.pib_real)),
        Column::new("inflacao".into(), floats(|r| r.inflacao)),
        Column::new("juros".into(), floats(|r| r.juros)),
        Column::new("cambio".into(), floats(|r| r.cambio)),
        Column::new(
            "producao_industrial".into(),
            floats(|r| r.producao_industrial),
        ),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Overwrite the persisted scenario file with canonical-form data.
/// Full replace, never an append.
#[instrument(skip(rows))]
pub fn write_scenario(path: &Path, rows: &[(NaiveDate, ScenarioRow)]) -> Result<()> {
    write_frame(scenario_frame(rows)?, path)
}

/// Load the forecast result written by the external process.
pub fn load_forecast(path: &Path) -> Result<ForecastResult> {
    let df = read_frame(path)?;
    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let key = match str_at(&df, ".key", i)?.as_str() {
            "actual" => ForecastKey::Actual,
            "prediction" => ForecastKey::Prediction,
            other => {
                return Err(schema_error(
                    ".key",
                    i,
                    format!("unknown discriminator '{other}'"),
                ));
            }
        };
        rows.push(ForecastRow {
            index: date_at(&df, ".index", i)?,
            key,
            value: f64_at(&df, ".value", i)?,
            conf_lo: opt_f64_at(&df, ".conf_lo", i)?,
            conf_hi: opt_f64_at(&df, ".conf_hi", i)?,
        });
    }
    Ok(ForecastResult { rows })
}

/// Write a forecast result frame. The service itself never produces
/// forecasts; this is used by `seed` to place a demo result and by tests.
#[instrument(skip(result))]
pub fn write_forecast(path: &Path, result: &ForecastResult) -> Result<()> {
    let dates =
        DateChunked::from_naive_date(".index".into(), result.rows.iter().map(|r| r.index))
            .into_series();
    let keys = result
        .rows
        .iter()
        .map(|r| match r.key {
            ForecastKey::Actual => "actual",
            ForecastKey::Prediction => "prediction",
        })
        .collect::<Vec<_>>();
    let columns = vec![
        dates.into_column(),
        Column::new(".key".into(), keys),
        Column::new(
            ".value".into(),
            result.rows.iter().map(|r| r.value).collect::<Vec<_>>(),
        ),
        Column::new(
            ".conf_lo".into(),
            result.rows.iter().map(|r| r.conf_lo).collect::<Vec<_>>(),
        ),
        Column::new(
            ".conf_hi".into(),
            result.rows.iter().map(|r| r.conf_hi).collect::<Vec<_>>(),
        ),
    ];
    write_frame(DataFrame::new(columns)?, path)
}

/// Write the indicator series. Used by `seed`.
#[instrument(skip(series))]
pub fn write_indicators(path: &Path, series: &IndicatorSeries) -> Result<()> {
    let dates = DateChunked::from_naive_date("ano_mes".into(), series.dates.iter().copied())
        .into_series();
    let columns = vec![
        dates.into_column(),
        Column::new("pib_real".into(), series.pib_real.clone()),
        Column::new("inflacao".into(), series.inflacao.clone()),
        Column::new("juros".into(), series.juros.clone()),
        Column::new("cambio".into(), series.cambio.clone()),
        Column::new(
            "producao_industrial".into(),
            series.producao_industrial.clone(),
        ),
    ];
    write_frame(DataFrame::new(columns)?, path)
}

/// Write the flat delimited export form of a forecast result. Used by
/// `seed`; after real runs the external process writes this file itself.
#[instrument(skip(result))]
pub fn write_forecast_csv(path: &Path, result: &ForecastResult) -> Result<()> {
    let dates =
        DateChunked::from_naive_date(".index".into(), result.rows.iter().map(|r| r.index))
            .into_series();
    let keys = result
        .rows
        .iter()
        .map(|r| match r.key {
            ForecastKey::Actual => "actual",
            ForecastKey::Prediction => "prediction",
        })
        .collect::<Vec<_>>();
    let mut df = DataFrame::new(vec![
        dates.into_column(),
        Column::new(".key".into(), keys),
        Column::new(
            ".value".into(),
            result.rows.iter().map(|r| r.value).collect::<Vec<_>>(),
        ),
        Column::new(
            ".conf_lo".into(),
            result.rows.iter().map(|r| r.conf_lo).collect::<Vec<_>>(),
        ),
        Column::new(
            ".conf_hi".into(),
            result.rows.iter().map(|r| r.conf_hi).collect::<Vec<_>>(),
        ),
    ])?;
    CsvWriter::new(create(path)?).finish(&mut df)?;
    Ok(())
}
