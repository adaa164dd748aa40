use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use irrigation_dashboard::{
    app, Alert, AlertCategory, AppState, Config, GeoPoint, MockFeed, SensorBundle, Station,
    StationStatus,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_test::assert_ok;

// ---

fn station(n: u32, status: StationStatus, et0: f64) -> Station {
    // ---
    Station {
        id: format!("station-{}", n),
        name: format!("Canal Gate {}", n),
        status,
        location: GeoPoint {
            lat: 16.5 + f64::from(n) * 0.1,
            lng: 104.7,
        },
        last_updated: Utc.with_ymd_and_hms(2025, 3, 26, 18, 45, 0).unwrap(),
        sensors: SensorBundle {
            temperature: 27.5,
            humidity: 68.0,
            wind_speed: 3.4,
            solar_radiation: 620.0,
            et0,
            rainfall: 12.0,
            water_level: 1.5,
        },
    }
}

fn alert(n: u32, minutes_ago: i64, acknowledged: bool) -> Alert {
    // ---
    Alert {
        id: format!("alert-{}", n),
        station_name: format!("Canal Gate {}", n),
        category: AlertCategory::Weather,
        message: format!("Condition {}", n),
        raised_at: Utc.with_ymd_and_hms(2025, 3, 26, 12, 0, 0).unwrap()
            - Duration::minutes(minutes_ago),
        acknowledged,
    }
}

/// Serve the app on an ephemeral port with a fixed feed.
async fn spawn_app() -> Result<(String, AppState)> {
    // ---
    let feed = Arc::new(MockFeed::fixed(
        vec![
            station(1, StationStatus::Online, 4.10),
            station(2, StationStatus::Online, 4.20),
            station(3, StationStatus::Warning, 3.90),
            station(4, StationStatus::Offline, 5.00),
            station(5, StationStatus::Online, 4.55),
        ],
        vec![
            alert(1, 50, false),
            alert(2, 5, false),
            alert(3, 30, true),
            alert(4, 10, false),
            alert(5, 40, false),
            alert(6, 20, true),
        ],
    ));
    let state = AppState::new(Config::default(), feed.clone(), feed);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = app(state.clone());
    tokio::spawn(async move { axum::serve(listener, router).await });

    Ok((format!("http://{}", addr), state))
}

/// Pull the page session id out of `<body data-session="...">`.
fn session_id(html: &str) -> Option<String> {
    // ---
    let start = html.find("data-session=\"")? + "data-session=\"".len();
    let len = html[start..].find('"')?;
    Some(html[start..start + len].to_string())
}

#[derive(Debug, Deserialize)]
struct Summary {
    station_count: usize,
    online_count: usize,
    average_et0: f64,
    pending_alerts: usize,
}

#[derive(Debug, Deserialize)]
struct AlertRow {
    id: String,
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    date: NaiveDate,
    et0: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let body: serde_json::Value = Client::new()
        .get(format!("{}/health", base))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn summary_aggregates_station_snapshot() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let summary: Summary = Client::new()
        .get(format!("{}/api/summary", base))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(summary.station_count, 5);
    assert_eq!(summary.online_count, 3);
    assert_eq!(format!("{:.2}", summary.average_et0), "4.35");
    assert_eq!(summary.pending_alerts, 4);
    Ok(())
}

#[tokio::test]
async fn alerts_are_most_recent_first_and_bounded() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let client = Client::new();

    let recent: Vec<AlertRow> = client
        .get(format!("{}/api/alerts?limit=4", base))
        .send()
        .await?
        .json()
        .await?;
    let ids: Vec<&str> = recent.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["alert-2", "alert-4", "alert-6", "alert-3"]);

    let all: Vec<AlertRow> = client
        .get(format!("{}/api/alerts", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all.len(), 6);
    assert_eq!(all[5].id, "alert-1");
    Ok(())
}

#[tokio::test]
async fn history_returns_consecutive_days_ending_today() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let rows: Vec<HistoryRow> = Client::new()
        .get(format!("{}/api/history/station-2?days=30", base))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(rows.len(), 30);
    for pair in rows.windows(2) {
        assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
    }
    let today = Local::now().date_naive();
    let last = rows.last().map(|r| r.date);
    // Allow for the test straddling local midnight.
    assert!(last == Some(today) || last == Some(today - Duration::days(1)));
    assert!(rows.iter().all(|r| r.et0 >= 0.0));
    assert!(rows.iter().all(|r| (0.0..=100.0).contains(&r.humidity)));
    Ok(())
}

#[tokio::test]
async fn history_defaults_and_rejects_oversized_windows() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let client = Client::new();

    let rows: Vec<HistoryRow> = client
        .get(format!("{}/api/history/station-1", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(rows.len(), 7);

    let resp = client
        .get(format!("{}/api/history/station-1?days=367", base))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = resp.json().await?;
    assert_eq!(body.code, "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn malformed_queries_return_json_errors() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let client = Client::new();

    for path in ["/api/history/station-1?days=-1", "/api/alerts?limit=x"] {
        let resp = client.get(format!("{}{}", base, path)).send().await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body: ErrorBody = resp.json().await?;
        assert_eq!(body.code, "BAD_REQUEST");
    }
    Ok(())
}

#[tokio::test]
async fn export_serves_csv_attachment() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let resp = Client::new()
        .get(format!("{}/api/stations/export.csv", base))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[reqwest::header::CONTENT_TYPE].to_str()?.to_string();
    assert!(content_type.starts_with("text/csv"));
    let disposition = resp.headers()[reqwest::header::CONTENT_DISPOSITION]
        .to_str()?
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"stations-"));
    assert!(disposition.ends_with(".csv\""));

    let body = resp.text().await?;
    let mut lines = body.lines();
    assert!(lines
        .next()
        .is_some_and(|h| h.starts_with("id,name,status,latitude,longitude")));
    assert_eq!(lines.count(), 5);
    Ok(())
}

#[tokio::test]
async fn root_redirects_to_dashboard() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let resp = Client::new().get(format!("{}/", base)).send().await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/dashboard");
    Ok(())
}

#[tokio::test]
async fn dashboard_mounts_a_session_that_unmounts_once() -> Result<()> {
    // ---
    let (base, state) = spawn_app().await?;
    let client = Client::new();

    let html = client
        .get(format!("{}/dashboard?tab=trends", base))
        .send()
        .await?
        .text()
        .await?;
    assert_eq!(html.matches("<svg").count(), 7);
    assert!(html.contains("data-clock"));

    let id = session_id(&html).expect("dashboard should carry a session id");
    assert_eq!(state.sessions.live_count(), 1);

    let first = client
        .post(format!("{}/sessions/{}/unmount", base, id))
        .send()
        .await?;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    assert_eq!(state.sessions.live_count(), 0);

    let second = client
        .post(format!("{}/sessions/{}/unmount", base, id))
        .send()
        .await?;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn session_stream_pushes_clock_frames() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let client = Client::new();

    let html = client
        .get(format!("{}/dashboard", base))
        .send()
        .await?
        .text()
        .await?;
    let id = session_id(&html).expect("dashboard should carry a session id");

    let mut events = client
        .get(format!("{}/sessions/{}/events", base, id))
        .send()
        .await?;
    assert_eq!(events.status(), StatusCode::OK);
    let content_type = events.headers()[reqwest::header::CONTENT_TYPE].to_str()?.to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let chunk = assert_ok!(events.chunk().await).expect("first frame");
    let text = String::from_utf8_lossy(&chunk);
    assert!(text.contains("data:"));
    assert!(text.contains("\"clock\""));
    assert!(text.contains("\"highlight\""));

    let unknown = client
        .get(format!("{}/sessions/{}/events", base, uuid::Uuid::new_v4()))
        .send()
        .await?;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn map_popup_style_is_removed_after_each_unmount() -> Result<()> {
    // ---
    let (base, state) = spawn_app().await?;
    let client = Client::new();
    let before = state.styles.count();

    for _ in 0..2 {
        let html = client
            .get(format!("{}/stations/map", base))
            .send()
            .await?
            .text()
            .await?;
        assert_eq!(html.matches("data-style-id=\"map-popup\"").count(), 1);
        assert!(html.contains("id=\"station-map\""));
        assert!(html.contains("leaflet"));

        let id = session_id(&html).expect("map should carry a session id");
        let resp = client
            .post(format!("{}/sessions/{}/unmount", base, id))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.styles.count(), before);

        let list = client
            .get(format!("{}/stations/list", base))
            .send()
            .await?
            .text()
            .await?;
        assert!(!list.contains("data-style-id"));
    }
    Ok(())
}

#[tokio::test]
async fn supplementary_pages_render() -> Result<()> {
    // ---
    let (base, _state) = spawn_app().await?;
    let client = Client::new();

    let alerts = client.get(format!("{}/alerts", base)).send().await?.text().await?;
    assert!(alerts.contains("4 pending"));
    assert_eq!(alerts.matches("class=\"acknowledged\"").count(), 2);

    let list = client
        .get(format!("{}/stations/list", base))
        .send()
        .await?
        .text()
        .await?;
    assert!(list.contains("5 stations"));
    assert!(list.contains("/stations/sensor-logs/station-3"));
    assert!(!list.contains("data-session"));
    Ok(())
}
