use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error types for scenario table edits and conversions
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// The raw text of an indicator cell could not be parsed as a number
    #[error("Invalid numeric value '{value}' for column '{column}': {source}")]
    InvalidNumber {
        column: &'static str,
        value: String,
        source: std::num::ParseFloatError,
    },

    /// The period cell is not in MM/YYYY form
    #[error("Invalid period '{value}': expected MM/YYYY")]
    InvalidPeriod { value: String },

    /// The addressed cell does not exist
    #[error("Cell ({row}, {column}) is out of range")]
    CellOutOfRange { row: usize, column: usize },
}

/// Expected type of a scenario cell, declared per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Display-formatted MM/YYYY period label
    Period,
    /// Floating-point indicator value
    Float,
}

/// Declared schema entry for one scenario column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Canonical (storage) column name
    pub name: &'static str,
    /// Human-readable label used by the grid view
    pub label: &'static str,
    pub kind: CellKind,
}

/// Column schema shared by the Indicator Series and the Scenario Table.
///
/// Cell coercion and canonicalization consult this table rather than
/// hard-coded column positions, so a reordering of the schema cannot
/// silently corrupt a column.
pub const SCENARIO_COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec {
        name: "ano_mes",
        label: "Período",
        kind: CellKind::Period,
    },
    ColumnSpec {
        name: "pib_real",
        label: "Produto Interno Bruto (R$, deflacionado)",
        kind: CellKind::Float,
    },
    ColumnSpec {
        name: "inflacao",
        label: "Taxa de Inflação (IPCA, var. %)",
        kind: CellKind::Float,
    },
    ColumnSpec {
        name: "juros",
        label: "Taxa de Juros (Selic, % a.m.)",
        kind: CellKind::Float,
    },
    ColumnSpec {
        name: "cambio",
        label: "Taxa de Câmbio (dólar, média)",
        kind: CellKind::Float,
    },
    ColumnSpec {
        name: "producao_industrial",
        label: "Produção Industrial (índice, s.a.)",
        kind: CellKind::Float,
    },
];

/// A typed scenario cell value after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CellValue {
    Period(String),
    Float(f64),
}

/// Coerce raw edit text against the declared schema of `spec`.
///
/// Indicator columns parse to `f64`; the period column passes through as a
/// plain string (it is already display-formatted). Malformed numeric text
/// is an error, never a default.
pub fn coerce_cell(spec: &ColumnSpec, raw: &str) -> Result<CellValue, ScenarioError> {
    match spec.kind {
        CellKind::Period => Ok(CellValue::Period(raw.to_string())),
        CellKind::Float => raw
            .trim()
            .parse::<f64>()
            .map(CellValue::Float)
            .map_err(|source| ScenarioError::InvalidNumber {
                column: spec.name,
                value: raw.to_string(),
                source,
            }),
    }
}

/// Format a canonical month date into its MM/YYYY display label.
pub fn format_period(date: NaiveDate) -> String {
    date.format("%m/%Y").to_string()
}

/// Parse an MM/YYYY display label back into the first day of that month.
pub fn parse_period(label: &str) -> Result<NaiveDate, ScenarioError> {
    let invalid = || ScenarioError::InvalidPeriod {
        value: label.to_string(),
    };
    let (month, year) = label.split_once('/').ok_or_else(invalid)?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// One scenario row in display form: the period as an MM/YYYY label and the
/// indicator values at full precision (rounding happens at render time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScenarioRow {
    pub period: String,
    pub pib_real: f64,
    pub inflacao: f64,
    pub juros: f64,
    pub cambio: f64,
    pub producao_industrial: f64,
}

impl ScenarioRow {
    fn value_mut(&mut self, name: &'static str) -> &mut f64 {
        match name {
            "pib_real" => &mut self.pib_real,
            "inflacao" => &mut self.inflacao,
            "juros" => &mut self.juros,
            "cambio" => &mut self.cambio,
            "producao_industrial" => &mut self.producao_industrial,
            other => unreachable!("column '{other}' is not an indicator column"),
        }
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        match name {
            "pib_real" => Some(self.pib_real),
            "inflacao" => Some(self.inflacao),
            "juros" => Some(self.juros),
            "cambio" => Some(self.cambio),
            "producao_industrial" => Some(self.producao_industrial),
            _ => None,
        }
    }
}

/// The user-editable scenario table, held in display form between edits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScenarioTable {
    pub rows: Vec<ScenarioRow>,
}

impl ScenarioTable {
    pub fn new(rows: Vec<ScenarioRow>) -> Self {
        Self { rows }
    }

    /// Apply a single cell edit `(row, column, raw_text)`.
    ///
    /// The raw text is coerced against the declared column schema and the
    /// typed value written into the in-memory table that the pipeline
    /// consults on the next run.
    pub fn apply_edit(
        &mut self,
        row: usize,
        column: usize,
        raw: &str,
    ) -> Result<CellValue, ScenarioError> {
        let spec = SCENARIO_COLUMNS
            .get(column)
            .ok_or(ScenarioError::CellOutOfRange { row, column })?;
        if row >= self.rows.len() {
            return Err(ScenarioError::CellOutOfRange { row, column });
        }
        let value = coerce_cell(spec, raw)?;
        match &value {
            CellValue::Period(p) => self.rows[row].period = p.clone(),
            CellValue::Float(v) => *self.rows[row].value_mut(spec.name) = *v,
        }
        Ok(value)
    }

    /// Canonicalize the display table: parse every period label back into a
    /// calendar date, keeping the indicator values as floats.
    pub fn to_canonical(&self) -> Result<Vec<(NaiveDate, ScenarioRow)>, ScenarioError> {
        self.rows
            .iter()
            .map(|row| Ok((parse_period(&row.period)?, row.clone())))
            .collect()
    }
}
