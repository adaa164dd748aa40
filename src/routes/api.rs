//! JSON API: snapshot aggregates, stations, alerts, history and CSV export.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::MAX_HISTORY_DAYS, export::stations_to_csv, history::generate_historical_data,
    Alert, AppError, AppState, HistoricalPoint, SensorSnapshot, Station,
};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/summary", get(summary))
        .route("/api/stations", get(stations))
        .route("/api/stations/export.csv", get(export_csv))
        .route("/api/alerts", get(alerts))
        .route("/api/history/{station_id}", get(history))
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    #[serde(flatten)]
    snapshot: SensorSnapshot,
    pending_alerts: usize,
}

async fn summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    // ---
    debug!("GET /api/summary");
    let stations = state.stations.stations();
    Json(SummaryResponse {
        snapshot: SensorSnapshot::from_stations(&stations),
        pending_alerts: state.alert_feed().pending_count(),
    })
}

async fn stations(State(state): State<AppState>) -> Json<Vec<Station>> {
    // ---
    debug!("GET /api/stations");
    Json(state.stations.stations())
}

#[derive(Debug, Deserialize)]
struct AlertsQuery {
    limit: Option<usize>,
}

async fn alerts(
    params: Result<Query<AlertsQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Alert>>, AppError> {
    // ---
    let Query(params) = params?;
    debug!("GET /api/alerts - limit={:?}", params.limit);
    let feed = state.alert_feed();
    let alerts = match params.limit {
        Some(limit) => feed.recent(limit),
        None => feed.all(),
    };
    Ok(Json(alerts.to_vec()))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    days: Option<u32>,
}

async fn history(
    Path(station_id): Path<String>,
    params: Result<Query<HistoryQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoricalPoint>>, AppError> {
    // ---
    let Query(params) = params?;
    let days = params.days.unwrap_or(state.config.history_days);
    debug!("GET /api/history/{} - days={}", station_id, days);

    if days > MAX_HISTORY_DAYS {
        return Err(AppError::BadRequest(format!(
            "days must be at most {}, got {}",
            MAX_HISTORY_DAYS, days
        )));
    }

    Ok(Json(generate_historical_data(&station_id, days)))
}

async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    // ---
    let stations = state.stations.stations();
    let body = stations_to_csv(&stations)?;
    let filename = format!("stations-{}.csv", Local::now().format("%Y-%m-%d"));
    info!("GET /api/stations/export.csv - {} stations", stations.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
