use anyhow::Result;
use chrono::{Months, NaiveDate};
use tracing::{debug, info, trace};

use crate::store::{
    self, DataPaths, ForecastKey, ForecastResult, ForecastRow, IndicatorSeries,
};
use crate::scenario::ScenarioRow;

/// Write synthetic starter datasets so the server and the forecasting
/// script have something to work with on a fresh checkout. Values follow
/// simple deterministic trends; they are placeholders, not real series.
pub fn seed(data_dir: &str) -> Result<()> {
    trace!("Entering seed function");
    info!("Seeding starter datasets into '{}'", data_dir);
    std::fs::create_dir_all(data_dir)?;
    let paths = DataPaths::new(data_dir);

    let start = NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid seed start date");
    let months = 120usize;

    let mut series = IndicatorSeries::default();
    for i in 0..months {
        let t = i as f64;
        series.dates.push(start + Months::new(i as u32));
        series.pib_real.push(600_000.0 + 900.0 * t + 8_000.0 * (t / 6.0).sin());
        series.inflacao.push(0.45 + 0.25 * (t / 9.0).sin());
        series.juros.push(0.9 + 0.35 * (t / 14.0).cos());
        series.cambio.push(3.2 + 0.015 * t + 0.3 * (t / 11.0).sin());
        series.producao_industrial.push(95.0 + 6.0 * (t / 8.0).sin());
    }
    store::write_indicators(&paths.indicators(), &series)?;
    debug!("Wrote {} indicator rows", months);

    // Scenario template: six assumed future months continuing the series
    let scenario_start = start + Months::new(months as u32);
    let scenario: Vec<(NaiveDate, ScenarioRow)> = (0..6)
        .map(|i| {
            let date = scenario_start + Months::new(i);
            (
                date,
                ScenarioRow {
                    period: crate::scenario::format_period(date),
                    pib_real: 710_000.0 + 1_000.0 * i as f64,
                    inflacao: 0.45,
                    juros: 0.85,
                    cambio: 5.05,
                    producao_industrial: 98.0,
                },
            )
        })
        .collect();
    store::write_scenario(&paths.scenario(), &scenario)?;
    debug!("Wrote {} scenario rows", scenario.len());

    // Demo forecast so the fan chart renders before the first real run
    let mut forecast = ForecastResult::default();
    for i in 0..24u32 {
        forecast.rows.push(ForecastRow {
            index: start + Months::new(months as u32 - 24 + i),
            key: ForecastKey::Actual,
            value: 180_000.0 + 400.0 * i as f64,
            conf_lo: None,
            conf_hi: None,
        });
    }
    for i in 0..6u32 {
        let value = 190_000.0 + 500.0 * i as f64;
        let spread = 2_500.0 * (i + 1) as f64;
        forecast.rows.push(ForecastRow {
            index: scenario_start + Months::new(i),
            key: ForecastKey::Prediction,
            value,
            conf_lo: Some(value - spread),
            conf_hi: Some(value + spread),
        });
    }
    store::write_forecast(&paths.forecast(), &forecast)?;
    store::write_forecast_csv(&paths.forecast_csv(), &forecast)?;
    debug!("Wrote {} forecast rows", forecast.rows.len());

    info!("Seed completed successfully");
    Ok(())
}
