use std::path::PathBuf;

use crate::store::DataPaths;

/// Application configuration, resolved from CLI arguments and the
/// environment (a `.env` file is honored at startup).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the three dataset files
    pub data_dir: PathBuf,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// External forecasting command, program followed by its arguments.
    /// The process reads the scenario and indicator files and writes the
    /// forecast result as a side effect.
    pub forecast_command: Vec<String>,
}

impl AppConfig {
    pub fn new(data_dir: &str, bind_address: &str, forecast_cmd: &str) -> Self {
        Self {
            data_dir: PathBuf::from(data_dir),
            bind_address: bind_address.to_string(),
            forecast_command: forecast_cmd
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir)
    }
}
