mod config;
mod error;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::{
    BuildingKeyFigures, BuildingRecord, MatrixLookup, ScenarioCell, ScenarioGrid, ScenarioMatrix,
    compute_matrix, default_grid, key_figures, stress_point,
};

pub use config::{
    Cli, Command, ConfigError, DEFAULT_MAX_AXIS_LEN, DEFAULT_PORT, LogLevel, MatrixArgs,
    ServeArgs, ServerConfig,
};
pub use error::ApiError;

/// Financing assumed when a request names a building but no rate or loan-to-value.
pub const DEFAULT_INTEREST_RATE: f64 = 4.5;
pub const DEFAULT_LOAN_TO_VALUE: f64 = 80.0;

#[derive(Clone)]
struct AppState {
    config: Arc<ServerConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    building: Value,
    interest_rates: Option<Vec<f64>>,
    loan_to_value_ratios: Option<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LookupPayload {
    building: Value,
    interest_rates: Option<Vec<f64>>,
    loan_to_value_ratios: Option<Vec<f64>>,
    interest_rate: Option<f64>,
    loan_to_value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FinancingPayload {
    building: Value,
    interest_rate: Option<f64>,
    loan_to_value: Option<f64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    profit_before_interest: f64,
    lookup: Option<MatrixLookup>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisResponse {
    name: String,
    address: String,
    total_operating_cost: f64,
    key_figures: BuildingKeyFigures,
    financing: ScenarioCell,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn build_router(config: Arc<ServerConfig>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/scenarios/default-grid", get(default_grid_handler))
        .route("/api/scenarios", post(scenarios_handler))
        .route("/api/scenarios/lookup", post(lookup_handler))
        .route("/api/stress", post(stress_handler))
        .route("/api/analysis", post(analysis_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { config })
}

pub async fn run_http_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;
    let max_axis_len = config.max_axis_len;
    let app = build_router(Arc::new(config));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, max_axis_len, "estates calculator listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// One-shot CLI counterpart of `POST /api/scenarios`.
pub fn run_matrix_command(args: &MatrixArgs) -> Result<String, ConfigError> {
    let financials = args.financials()?;
    let (rates, ltvs) = args.axes();

    let matrix = compute_matrix(&financials, &rates, &ltvs);
    tracing::debug!(
        rows = matrix.rows(),
        columns = matrix.columns(),
        "computed scenario matrix"
    );

    let encoded = if args.compact {
        serde_json::to_string(&matrix)
    } else {
        serde_json::to_string_pretty(&matrix)
    };
    encoded.map_err(ConfigError::Encode)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { ok: true })
}

async fn default_grid_handler() -> Response {
    json_response(StatusCode::OK, default_grid())
}

async fn scenarios_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScenarioPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let matrix = scenario_matrix(
        &payload.building,
        payload.interest_rates,
        payload.loan_to_value_ratios,
        state.config.max_axis_len,
    )?;
    Ok(json_response(StatusCode::OK, matrix))
}

async fn lookup_handler(
    State(state): State<AppState>,
    payload: Result<Json<LookupPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let matrix = scenario_matrix(
        &payload.building,
        payload.interest_rates,
        payload.loan_to_value_ratios,
        state.config.max_axis_len,
    )?;
    let lookup = matrix.nearest(
        payload.interest_rate.unwrap_or(DEFAULT_INTEREST_RATE),
        payload.loan_to_value.unwrap_or(DEFAULT_LOAN_TO_VALUE),
    );
    Ok(json_response(
        StatusCode::OK,
        LookupResponse {
            profit_before_interest: matrix.profit_before_interest,
            lookup,
        },
    ))
}

async fn stress_handler(
    payload: Result<Json<FinancingPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let record = BuildingRecord::from_json(&payload.building);
    let cell = financing_cell(&record, payload.interest_rate, payload.loan_to_value);
    Ok(json_response(StatusCode::OK, cell))
}

async fn analysis_handler(
    payload: Result<Json<FinancingPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let record = BuildingRecord::from_json(&payload.building);
    let financing = financing_cell(&record, payload.interest_rate, payload.loan_to_value);
    let response = AnalysisResponse {
        total_operating_cost: record.operating_cost(),
        key_figures: key_figures(&record),
        financing,
        name: record.name,
        address: record.address,
    };
    Ok(json_response(StatusCode::OK, response))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn scenario_matrix(
    building: &Value,
    interest_rates: Option<Vec<f64>>,
    loan_to_value_ratios: Option<Vec<f64>>,
    max_axis_len: usize,
) -> Result<ScenarioMatrix, ApiError> {
    let grid = resolve_grid(interest_rates, loan_to_value_ratios, max_axis_len)?;
    let financials = BuildingRecord::from_json(building).financials();
    let matrix = compute_matrix(&financials, &grid.interest_rates, &grid.loan_to_value_ratios);
    tracing::debug!(
        rows = matrix.rows(),
        columns = matrix.columns(),
        "computed scenario matrix"
    );
    Ok(matrix)
}

fn resolve_grid(
    interest_rates: Option<Vec<f64>>,
    loan_to_value_ratios: Option<Vec<f64>>,
    max_axis_len: usize,
) -> Result<ScenarioGrid, ApiError> {
    let defaults = default_grid();
    let grid = ScenarioGrid {
        interest_rates: interest_rates.unwrap_or(defaults.interest_rates),
        loan_to_value_ratios: loan_to_value_ratios.unwrap_or(defaults.loan_to_value_ratios),
    };
    check_axis("interestRates", grid.interest_rates.len(), max_axis_len)?;
    check_axis("loanToValueRatios", grid.loan_to_value_ratios.len(), max_axis_len)?;
    Ok(grid)
}

fn check_axis(axis: &'static str, len: usize, max: usize) -> Result<(), ApiError> {
    if len > max {
        return Err(ApiError::AxisTooLong { axis, len, max });
    }
    Ok(())
}

fn financing_cell(
    record: &BuildingRecord,
    interest_rate: Option<f64>,
    loan_to_value: Option<f64>,
) -> ScenarioCell {
    stress_point(
        &record.financials(),
        interest_rate.unwrap_or(DEFAULT_INTEREST_RATE),
        loan_to_value.unwrap_or(DEFAULT_LOAN_TO_VALUE),
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
