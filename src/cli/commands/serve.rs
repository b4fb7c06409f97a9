use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::AppConfig;
use crate::router::create_router;
use crate::schemas::AppState;
use crate::store::Datasets;

pub async fn serve(data_dir: &str, bind_address: &str, forecast_cmd: &str) -> Result<()> {
    trace!("Entering serve function");
    info!("Previsor application starting up");
    debug!("Data directory: {}", data_dir);
    debug!("Bind address: {}", bind_address);
    debug!("Forecast command: {}", forecast_cmd);

    let config = AppConfig::new(data_dir, bind_address, forecast_cmd);

    // Load the session datasets
    trace!("Loading datasets");
    let datasets = match Datasets::load(&config.paths()) {
        Ok(datasets) => {
            debug!("Datasets loaded successfully");
            datasets
        }
        Err(e) => {
            error!("Failed to load datasets from '{}': {}", data_dir, e);
            return Err(e.into());
        }
    };
    let state = AppState::new(config, datasets);

    // Create router
    trace!("Creating application router");
    let app = create_router(state);
    debug!("Router created successfully");

    // Start server
    info!("Starting server on {}", bind_address);
    trace!("Attempting to bind TCP listener to {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Previsor API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    debug!("Server is ready to accept connections");

    trace!("Starting axum server");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
