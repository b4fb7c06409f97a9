use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::{seed, serve};

#[derive(Parser)]
#[command(name = "previsor")]
#[command(about = "Macro forecast dashboard server and data tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Directory holding the dataset files (dados.parquet,
        /// cenarios.parquet, previsao.parquet, previsao.csv)
        #[arg(short, long, env = "DATA_DIR", default_value = "dados")]
        data_dir: String,

        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
        bind_address: String,

        /// External forecasting command, invoked on each run
        #[arg(short, long, env = "FORECAST_CMD", default_value = "Rscript previsao.R")]
        forecast_cmd: String,
    },
    /// Write synthetic starter datasets into the data directory
    ///
    /// Creates dados.parquet, cenarios.parquet and a demo forecast so the
    /// server can start against an empty directory.
    Seed {
        /// Directory to write the dataset files into; created if missing
        #[arg(short, long, env = "DATA_DIR", default_value = "dados")]
        data_dir: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve {
                data_dir,
                bind_address,
                forecast_cmd,
            } => {
                serve(&data_dir, &bind_address, &forecast_cmd).await?;
            }
            Commands::Seed { data_dir } => {
                seed(&data_dir)?;
            }
        }
        Ok(())
    }
}
