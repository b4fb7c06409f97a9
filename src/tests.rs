#[cfg(test)]
mod integration_tests {
    use crate::schemas::{ApiResponse, CellEditRequest};
    use crate::store::{self, DataPaths};
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_health_check() {
        // Setup test server
        let (app, _dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        // Send GET request to health endpoint
        let response = server.get("/health").await;

        // Verify response
        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["data_dir"], "reachable");
    }

    #[tokio::test]
    async fn test_indicators_chart_has_five_panels() {
        let (app, _dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/indicators/chart").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        let panels = body.data["panels"].as_array().unwrap();
        assert_eq!(panels.len(), 5);
        assert_eq!(body.data["grid_rows"], 2);
        assert_eq!(body.data["grid_cols"], 3);
        // Every panel carries one point per historical month
        for panel in panels {
            assert_eq!(panel["x"].as_array().unwrap().len(), 3);
            assert_eq!(panel["y"].as_array().unwrap().len(), 3);
        }
    }

    #[tokio::test]
    async fn test_scenario_grid_display_form() {
        let (app, _dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/scenario").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        let columns = body.data["columns"].as_array().unwrap();
        assert_eq!(columns[0], "Período");
        assert_eq!(columns[1], "Produto Interno Bruto (R$, deflacionado)");
        let rows = body.data["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "01/2025");
        assert_eq!(rows[0][1], "1000.00");
        assert_eq!(rows[0][5], "98.20");
    }

    #[tokio::test]
    async fn test_edit_cell_updates_grid() {
        let (app, _dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        // Edit the PIB cell of the first row
        let edit = CellEditRequest {
            row: 0,
            column: 1,
            value: "1234.567".to_string(),
        };
        let response = server.patch("/api/v1/scenario/cells").json(&edit).await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data, serde_json::json!(1234.567));

        // The grid shows the rounded display form
        let response = server.get("/api/v1/scenario").await;
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["rows"][0][1], "1234.57");
    }

    #[tokio::test]
    async fn test_edit_cell_rejects_malformed_number() {
        let (app, _dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        let edit = CellEditRequest {
            row: 0,
            column: 2,
            value: "abc".to_string(),
        };
        let response = server.patch("/api/v1/scenario/cells").json(&edit).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "SCENARIO_ERROR");
        assert_eq!(body["success"], false);

        // The cell keeps its previous value
        let response = server.get("/api/v1/scenario").await;
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["rows"][0][2], "0.50");
    }

    #[tokio::test]
    async fn test_edit_cell_out_of_range() {
        let (app, _dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        let edit = CellEditRequest {
            row: 42,
            column: 1,
            value: "1.0".to_string(),
        };
        let response = server.patch("/api/v1/scenario/cells").json(&edit).await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_forecast_success() {
        // The stub command succeeds; the forecast fixture stands in for the
        // file the external process would write.
        let (app, _dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        let response = server.post("/api/v1/forecast/run").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["scenario_rows"], 2);
        assert_eq!(body.data["actual_rows"], 3);
        assert_eq!(body.data["prediction_rows"], 2);
    }

    #[tokio::test]
    async fn test_run_forecast_writes_canonical_scenario() {
        let (app, dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        // Edit a cell, then run
        let edit = CellEditRequest {
            row: 0,
            column: 4,
            value: "5.25".to_string(),
        };
        server
            .patch("/api/v1/scenario/cells")
            .json(&edit)
            .await
            .assert_status(StatusCode::OK);
        server
            .post("/api/v1/forecast/run")
            .await
            .assert_status(StatusCode::OK);

        // The scenario file holds the canonical edited row
        let paths = DataPaths::new(dir.path());
        let written = store::load_scenario(&paths.scenario()).unwrap();
        assert_eq!(written.rows[0].period, "01/2025");
        assert_eq!(written.rows[0].cambio, 5.25);
        assert_eq!(written.rows[0].pib_real, 1000.0);

        // And the raw frame carries a real date column
        let canonical = written.rows[0].clone();
        assert_eq!(
            crate::scenario::parse_period(&canonical.period).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_run_forecast_failure_keeps_previous_chart() {
        let (app, _dir) = setup_test_app("false", true);
        let server = TestServer::new(app).unwrap();

        let response = server.post("/api/v1/forecast/run").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "PIPELINE_ERROR");

        // The previously loaded forecast is still served
        let response = server.get("/api/v1/forecast/chart").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forecast_chart_before_first_run_is_not_found() {
        let (app, _dir) = setup_test_app("true", false);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/forecast/chart").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "FORECAST_ERROR");
    }

    #[tokio::test]
    async fn test_forecast_chart_partitions_rows() {
        let (app, _dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/forecast/chart").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let traces = body.data["traces"].as_array().unwrap();
        assert_eq!(traces.len(), 4);
        // Prediction line first, actual line last, per the fixed trace order
        assert_eq!(traces[0]["name"], "Previsão");
        assert_eq!(traces[0]["y"].as_array().unwrap().len(), 2);
        assert_eq!(traces[3]["name"], "Emplacamentos");
        assert_eq!(traces[3]["y"].as_array().unwrap().len(), 3);
        // Band traces are unlabeled in the legend
        assert_eq!(traces[1]["show_legend"], false);
        assert_eq!(traces[2]["show_legend"], false);
        assert_eq!(traces[2]["fill"], "tonexty");
    }

    #[tokio::test]
    async fn test_download_forecast_streams_file_verbatim() {
        let (app, dir) = setup_test_app("true", true);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/forecast/download").await;

        response.assert_status(StatusCode::OK);
        let headers = response.headers();
        assert!(headers["content-type"].to_str().unwrap().starts_with("text/csv"));
        assert_eq!(
            headers["content-disposition"],
            "attachment; filename=\"previsao.csv\""
        );
        let on_disk = std::fs::read(dir.path().join("previsao.csv")).unwrap();
        assert_eq!(response.as_bytes().as_ref(), on_disk.as_slice());
    }

    #[tokio::test]
    async fn test_download_forecast_missing_file() {
        let (app, _dir) = setup_test_app("true", false);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/forecast/download").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "EXPORT_ERROR");
    }
}
