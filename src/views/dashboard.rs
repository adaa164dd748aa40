//! Dashboard page body: stat cards, ET₀ trend, alerts panel, trends tab.

use chrono::{DateTime, Local};
use maud::{html, Markup};
use rand::Rng;

use crate::{
    sensors::format_reading,
    series_of,
    views::{
        stat_card::{Icon, SecondaryValue, StatCard},
        trend_chart::TrendChart,
    },
    Alert, AlertCategory, AlertFeed, ChartPoint, HistoricalPoint, Metric, SensorSnapshot, Station,
};

// ---

/// Which dashboard tab is showing. Unknown values fall back to overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardTab {
    #[default]
    Overview,
    Trends,
}

impl DashboardTab {
    pub fn parse(raw: Option<&str>) -> Self {
        // ---
        match raw {
            Some("trends") => DashboardTab::Trends,
            _ => DashboardTab::Overview,
        }
    }

    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            DashboardTab::Overview => "overview",
            DashboardTab::Trends => "trends",
        }
    }
}

/// Readings no station reports yet; shown as sampled placeholders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientReadings {
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl AmbientReadings {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // ---
        Self {
            wind_speed: 3.2 + rng.random_range(0.0..1.5),
            wind_direction: 172.0 + rng.random_range(0.0..30.0),
            pressure: 1013.25 + rng.random_range(0.0..1.5),
            temperature: 22.0 + rng.random_range(0.0..5.0),
            humidity: 65.0 + rng.random_range(0.0..15.0),
        }
    }
}

/// Placeholder series around `center ± spread` on the history's dates.
fn mock_series<R: Rng + ?Sized>(
    history: &[HistoricalPoint],
    center: f64,
    spread: f64,
    rng: &mut R,
) -> Vec<ChartPoint> {
    // ---
    history
        .iter()
        .map(|p| ChartPoint {
            date: p.date,
            value: Some(center + rng.random_range(-spread..spread)),
        })
        .collect()
}

/// Everything the dashboard renders, gathered at mount.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub snapshot: SensorSnapshot,
    pub ambient: AmbientReadings,
    pub history: Vec<HistoricalPoint>,
    pub wind_direction: Vec<ChartPoint>,
    pub pressure: Vec<ChartPoint>,
    pub pending_alerts: usize,
    pub recent_alerts: Vec<Alert>,
}

impl DashboardData {
    pub fn assemble<R: Rng + ?Sized>(
        stations: &[Station],
        alerts: &AlertFeed,
        history: Vec<HistoricalPoint>,
        recent_limit: usize,
        rng: &mut R,
    ) -> Self {
        // ---
        let ambient = AmbientReadings::sample(rng);
        let wind_direction = mock_series(&history, 180.0, 45.0, rng);
        let pressure = mock_series(&history, 1013.25, 5.0, rng);

        Self {
            snapshot: SensorSnapshot::from_stations(stations),
            ambient,
            history,
            wind_direction,
            pressure,
            pending_alerts: alerts.pending_count(),
            recent_alerts: alerts.recent(recent_limit).to_vec(),
        }
    }
}

pub fn category_badge(category: AlertCategory) -> Markup {
    html! { span class={ "badge " (category.badge_class()) } { (category.as_str()) } }
}

/// Full dashboard body for `tab`, with the clock seeded at `now`.
pub fn dashboard(data: &DashboardData, tab: DashboardTab, now: DateTime<Local>) -> Markup {
    // ---
    html! {
        div.page-head {
            div {
                h1 { "Dashboard" }
                span.clock data-clock { (now.format("%H:%M:%S").to_string()) }
            }
            a.button href="/api/stations/export.csv" download { "⭳ Export" }
        }
        div.tabs {
            @for option in [DashboardTab::Overview, DashboardTab::Trends] {
                a.tab.active[option == tab] href={ "/dashboard?tab=" (option.as_str()) } {
                    @match option {
                        DashboardTab::Overview => "Overview",
                        DashboardTab::Trends => "Trends",
                    }
                }
            }
        }
        @match tab {
            DashboardTab::Overview => (overview(data)),
            DashboardTab::Trends => (trends(data)),
        }
    }
}

fn stat_cards(data: &DashboardData) -> [StatCard; 8] {
    // ---
    let snapshot = &data.snapshot;
    let ambient = &data.ambient;
    [
        StatCard::new("Online Sensors", snapshot.online_count.to_string(), Icon::Activity)
            .description("ISMMA2300")
            .color("#10b981")
            .accent("accent-emerald"),
        StatCard::new("ET₀ Today", format_reading(snapshot.average_et0), Icon::Thermometer)
            .unit("mm")
            .color("#f97316")
            .accent("accent-orange"),
        StatCard::new("Rainfall", format_reading(snapshot.average_rainfall), Icon::Cloud)
            .unit("mm")
            .color("#22c55e")
            .accent("accent-green"),
        StatCard::new("Water Level", format_reading(snapshot.average_water_level), Icon::Droplet)
            .unit("m")
            .accent("accent-blue"),
        StatCard::new("Wind Speed", format!("{:.1}", ambient.wind_speed), Icon::Wind)
            .unit("m/s")
            .color("#06b6d4")
            .secondary(SecondaryValue {
                label: Some("Direction".into()),
                value: format!("{:.0}", ambient.wind_direction),
                unit: Some("°".into()),
            })
            .accent("accent-cyan"),
        StatCard::new("Pressure", format!("{:.1}", ambient.pressure), Icon::Gauge)
            .unit("hPa")
            .color("#8b5cf6")
            .accent("accent-violet"),
        StatCard::new("Temperature", format!("{:.1}", ambient.temperature), Icon::Thermometer)
            .unit("°C")
            .color("#ef4444")
            .accent("accent-red"),
        StatCard::new("Humidity", format!("{:.1}", ambient.humidity), Icon::Droplet)
            .unit("%")
            .color("#6366f1")
            .accent("accent-indigo"),
    ]
}

fn overview(data: &DashboardData) -> Markup {
    // ---
    let cards = stat_cards(data);
    let et0 = series_of(&data.history, Metric::Et0);

    html! {
        div.grid.grid-4 {
            @for card in &cards[..4] { (card) }
        }
        div.grid.grid-4 {
            @for card in &cards[4..] { (card) }
        }
        div.card {
            div.card-head {
                h2 { "Overview" }
                p { "Current station data and recent alerts" }
            }
            div.card-body {
                div.grid.grid-main {
                    div.panel.accent-orange {
                        h3 { "ET₀ Trend" }
                        (TrendChart::new(&et0)
                            .color("#f97316")
                            .unit("mm")
                            .y_label("mm")
                            .height(280)
                            .show_header(false))
                    }
                    (alerts_panel(data.pending_alerts, &data.recent_alerts))
                }
            }
        }
    }
}

fn alerts_panel(pending: usize, recent: &[Alert]) -> Markup {
    // ---
    html! {
        div.panel.alerts-panel.accent-amber {
            h3 { "Alerts" }
            div.row {
                span.strong { "Pending" }
                span.badge.badge-amber { (pending) }
            }
            @for alert in recent {
                div.alert-item {
                    div.row-inline {
                        span.station { (alert.station_name) }
                        (category_badge(alert.category))
                    }
                    span.message { (alert.message) }
                }
            }
            div.panel-foot {
                a.button.outline href="/alerts" { "All Alerts" }
            }
        }
    }
}

fn trends(data: &DashboardData) -> Markup {
    // ---
    let series = |metric| series_of(&data.history, metric);
    let charts: [(&str, &str, &str, &str, Vec<ChartPoint>); 7] = [
        ("Temperature", "accent-orange", "#ef4444", "°C", series(Metric::Temperature)),
        ("Humidity", "accent-indigo", "#6366f1", "%", series(Metric::Humidity)),
        ("Wind Speed", "accent-cyan", "#64748b", "m/s", series(Metric::WindSpeed)),
        ("Wind Direction", "accent-slate", "#475569", "°", data.wind_direction.clone()),
        ("Pressure", "accent-violet", "#7c3aed", "hPa", data.pressure.clone()),
        ("Rainfall", "accent-green", "#0ea5e9", "mm", series(Metric::Rainfall)),
        ("Water Level", "accent-blue", "#3b82f6", "m", series(Metric::WaterLevel)),
    ];
    let last = charts.len() - 1;

    html! {
        div.card {
            div.card-head {
                h2 { "Station History" }
                p { "Sensor data visualization and trends" }
            }
            div.card-body {
                div.grid.grid-2 {
                    @for (i, (title, accent, color, unit, points)) in charts.iter().enumerate() {
                        @let class = if i == last { format!("panel {} span-2", accent) } else { format!("panel {}", accent) };
                        div class=(class) {
                            h3 { (title) }
                            (TrendChart::new(points)
                                .color(color)
                                .unit(unit)
                                .y_label(unit)
                                .height(250)
                                .show_header(false))
                        }
                    }
                }
            }
        }
    }
}
