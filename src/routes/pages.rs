//! HTML pages. Dashboard and map renders mount a page session.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use chrono::Local;
use maud::Markup;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    history::generate_historical_data,
    views::{
        dashboard::{dashboard, DashboardData, DashboardTab},
        map::{Grouping, MapView},
        map_page::{map_head, map_page},
        page,
        pages::{alerts_page, station_list_page},
        PageShell,
    },
    AppError, AppState, GeoPoint, PageKind,
};

// ---

/// Station whose history backs the dashboard charts.
const DASHBOARD_STATION: &str = "station-1";

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/dashboard", get(dashboard_page))
        .route("/stations/map", get(station_map))
        .route("/stations/list", get(station_list))
        .route("/alerts", get(alert_list))
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    tab: Option<String>,
}

async fn dashboard_page(
    Query(params): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Markup {
    // ---
    let tab = DashboardTab::parse(params.tab.as_deref());
    let stations = state.stations.stations();
    let feed = state.alert_feed();
    let history = generate_historical_data(DASHBOARD_STATION, state.config.history_days);
    let data = DashboardData::assemble(
        &stations,
        &feed,
        history,
        state.config.recent_alert_limit,
        &mut rand::rng(),
    );

    let session = state.sessions.mount(PageKind::Dashboard);
    info!("GET /dashboard - tab={} session={}", tab.as_str(), session);

    page(
        &PageShell {
            title: "Dashboard",
            path: "/dashboard",
            pending_alerts: data.pending_alerts,
            styles: &state.styles,
            session: Some(session),
            head: None,
        },
        dashboard(&data, tab, Local::now()),
    )
}

async fn station_map(State(state): State<AppState>) -> Result<Markup, AppError> {
    // ---
    let stations = state.stations.stations();
    let (lat, lng) = state.config.map_center;
    let view = MapView::build(&stations, Grouping::default(), GeoPoint { lat, lng });
    let body = map_page(&view)?;

    // Mount before rendering so the popup style is in the head.
    let session = state.sessions.mount(PageKind::Map);
    info!("GET /stations/map - {} markers session={}", view.markers.len(), session);

    Ok(page(
        &PageShell {
            title: "Station Map",
            path: "/stations/map",
            pending_alerts: state.alert_feed().pending_count(),
            styles: &state.styles,
            session: Some(session),
            head: Some(map_head()),
        },
        body,
    ))
}

async fn station_list(State(state): State<AppState>) -> Markup {
    // ---
    debug!("GET /stations/list");
    let stations = state.stations.stations();

    page(
        &PageShell {
            title: "Station List",
            path: "/stations/list",
            pending_alerts: state.alert_feed().pending_count(),
            styles: &state.styles,
            session: None,
            head: None,
        },
        station_list_page(&stations),
    )
}

async fn alert_list(State(state): State<AppState>) -> Markup {
    // ---
    debug!("GET /alerts");
    let feed = state.alert_feed();

    page(
        &PageShell {
            title: "Alerts",
            path: "/alerts",
            pending_alerts: feed.pending_count(),
            styles: &state.styles,
            session: None,
            head: None,
        },
        alerts_page(feed.all(), feed.pending_count()),
    )
}
