//! Chart construction: stateless functions turning the loaded datasets
//! into serializable chart payloads. Layout and styling follow the
//! dashboard's fixed design (small-multiple grid, fan chart with a filled
//! confidence band); no data is reordered or filtered here beyond the
//! actual/prediction split.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::scenario::{CellKind, ScenarioTable, SCENARIO_COLUMNS};
use crate::store::{ForecastKey, ForecastResult, IndicatorSeries};

/// One line trace of a chart.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Trace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub mode: String,
    pub line_color: String,
    pub line_width: u32,
    /// Fill directive for band traces ("tonexty" on the upper bound)
    pub fill: Option<String>,
    pub show_legend: bool,
}

/// One subplot of the historical small-multiple view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Panel {
    pub title: String,
    pub row: u32,
    pub col: u32,
    pub row_span: u32,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
}

/// The historical view: five indicator line panels in a fixed 2x3 grid,
/// with GDP spanning both rows of the first column.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndicatorPanels {
    pub grid_rows: u32,
    pub grid_cols: u32,
    pub panels: Vec<Panel>,
}

/// The forecast fan chart: actual line, prediction line, and a filled
/// confidence band between the two bound traces.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FanChart {
    pub traces: Vec<Trace>,
    pub y_axis_title: String,
    pub legend_orientation: String,
}

/// The scenario grid: labeled columns and display-formatted cells.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScenarioGrid {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn label_of(name: &str) -> String {
    SCENARIO_COLUMNS
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.label.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Build the historical multi-panel chart from the indicator series.
pub fn historical_panels(series: &IndicatorSeries) -> IndicatorPanels {
    let panel = |name: &str, row, col, row_span, y: &[f64]| Panel {
        title: label_of(name),
        row,
        col,
        row_span,
        x: series.dates.clone(),
        y: y.to_vec(),
    };
    IndicatorPanels {
        grid_rows: 2,
        grid_cols: 3,
        panels: vec![
            panel("pib_real", 1, 1, 2, &series.pib_real),
            panel("inflacao", 1, 2, 1, &series.inflacao),
            panel("juros", 1, 3, 1, &series.juros),
            panel("cambio", 2, 2, 1, &series.cambio),
            panel("producao_industrial", 2, 3, 1, &series.producao_industrial),
        ],
    }
}

/// Build the scenario grid in display form: MM/YYYY periods and values
/// rounded to two decimals. Rounding is presentation only, the underlying
/// table keeps full precision.
pub fn scenario_grid(table: &ScenarioTable) -> ScenarioGrid {
    let columns = SCENARIO_COLUMNS
        .iter()
        .map(|spec| spec.label.to_string())
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            SCENARIO_COLUMNS
                .iter()
                .map(|spec| match spec.kind {
                    CellKind::Period => row.period.clone(),
                    CellKind::Float => {
                        // value() covers every Float column of the schema
                        format!("{:.2}", row.value(spec.name).unwrap_or(f64::NAN))
                    }
                })
                .collect()
        })
        .collect();
    ScenarioGrid { columns, rows }
}

/// Build the fan chart from a forecast result.
///
/// Rows are split purely by the discriminator, in stored order. Prediction
/// values and bounds are truncated to whole counts for display; actuals are
/// passed through as stored. Bound traces carry no legend entry and the
/// upper bound fills back to the lower trace.
pub fn fan_chart(result: &ForecastResult) -> FanChart {
    let actual: Vec<_> = result
        .rows
        .iter()
        .filter(|r| r.key == ForecastKey::Actual)
        .collect();
    let prediction: Vec<_> = result
        .rows
        .iter()
        .filter(|r| r.key == ForecastKey::Prediction)
        .collect();

    let line = |name: &str, x: Vec<NaiveDate>, y: Vec<f64>, color: &str, width, legend| Trace {
        name: name.to_string(),
        x,
        y,
        mode: "lines".to_string(),
        line_color: color.to_string(),
        line_width: width,
        fill: None,
        show_legend: legend,
    };

    let pred_x: Vec<_> = prediction.iter().map(|r| r.index).collect();
    let mut traces = vec![line(
        "Previsão",
        pred_x.clone(),
        prediction.iter().map(|r| r.value.trunc()).collect(),
        "blue",
        2,
        true,
    )];
    traces.push(line(
        "Intervalo inferior",
        pred_x.clone(),
        prediction
            .iter()
            .map(|r| r.conf_lo.unwrap_or(f64::NAN).trunc())
            .collect(),
        "blue",
        1,
        false,
    ));
    let mut upper = line(
        "Intervalo superior",
        pred_x,
        prediction
            .iter()
            .map(|r| r.conf_hi.unwrap_or(f64::NAN).trunc())
            .collect(),
        "blue",
        1,
        false,
    );
    upper.fill = Some("tonexty".to_string());
    traces.push(upper);
    traces.push(line(
        "Emplacamentos",
        actual.iter().map(|r| r.index).collect(),
        actual.iter().map(|r| r.value).collect(),
        "black",
        2,
        true,
    ));

    FanChart {
        traces,
        y_axis_title: "Nº de Emplacamentos".to_string(),
        legend_orientation: "h".to_string(),
    }
}
