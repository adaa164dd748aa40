//! Station map: grouping, markers, relationship lines and popups.
//!
//! Tile rendering is left to Leaflet in the browser. This module only
//! decides what to draw and serializes it for the page script.

use chrono::Local;
use maud::{html, Markup};
use serde::Serialize;

use crate::{GeoPoint, Station, StationStatus};

// ---

pub const POPUP_STYLE_ID: &str = "map-popup";

/// Global CSS for the Leaflet popup skin; injected while a map is mounted.
pub const POPUP_CSS: &str = r#"
.leaflet-popup-content-wrapper{border-radius:8px;padding:0;overflow:hidden;box-shadow:0 10px 25px -5px rgba(0,0,0,.1),0 10px 10px -5px rgba(0,0,0,.04)}
.leaflet-popup-content{margin:0;width:auto!important;max-width:350px}
.leaflet-popup-close-button{color:#fff!important;font-size:18px!important;z-index:10;top:7px!important;right:7px!important}
.leaflet-popup-tip{background:#fff}
.popup-head{color:#fff;padding:12px;display:flex;flex-direction:column;gap:4px}
.popup-head.weather{background:#2563eb}.popup-head.water{background:#1d4ed8}
.popup-title{display:flex;justify-content:space-between;align-items:flex-start;gap:8px}
.popup-title h3{margin:0;font-size:15px}
.popup-meta{display:flex;justify-content:space-between;font-size:12px;opacity:.9}
.popup-tag{padding:1px 8px;border-radius:999px;background:rgba(255,255,255,.2)}
.popup-body{padding:12px;display:flex;flex-direction:column;gap:10px}
.reading-grid{display:grid;grid-template-columns:1fr 1fr;gap:8px}
.reading{padding:8px;border:1px solid #e2e8f0;border-radius:8px}
.reading .label{font-size:12px;color:#64748b}.reading .value{font-size:14px;font-weight:600}
.popup-actions{display:flex;gap:8px}.popup-actions a{flex:1;text-align:center;padding:6px;font-size:13px}
@media (max-width:500px){.leaflet-popup-content{width:280px!important}}
@media (max-width:350px){.leaflet-popup-content{width:250px!important}}
"#;

/// Display group a station is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StationGroup {
    Weather,
    Water,
}

impl StationGroup {
    pub fn line_color(self) -> &'static str {
        // ---
        match self {
            StationGroup::Weather => "#f97316",
            StationGroup::Water => "#3b82f6",
        }
    }

    /// Hardware model tag shown in the popup header.
    pub fn model_tag(self) -> &'static str {
        // ---
        match self {
            StationGroup::Weather => "ISMMA2300",
            StationGroup::Water => "DQA230.1",
        }
    }

    fn css_class(self) -> &'static str {
        // ---
        match self {
            StationGroup::Weather => "weather",
            StationGroup::Water => "water",
        }
    }
}

/// How stations are assigned to groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Grouping {
    /// Even list positions are weather, odd are water. Placeholder until
    /// stations carry their own kind.
    #[default]
    AlternatingIndex,
}

impl Grouping {
    pub fn group_of(self, index: usize, _station: &Station) -> StationGroup {
        // ---
        match self {
            Grouping::AlternatingIndex => {
                if index % 2 == 0 {
                    StationGroup::Weather
                } else {
                    StationGroup::Water
                }
            }
        }
    }
}

/// Stations split by group, each in original list order.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub weather: Vec<&'a Station>,
    pub water: Vec<&'a Station>,
}

pub fn partition_stations(stations: &[Station], grouping: Grouping) -> Partition<'_> {
    // ---
    let mut partition = Partition::default();
    for (i, station) in stations.iter().enumerate() {
        match grouping.group_of(i, station) {
            StationGroup::Weather => partition.weather.push(station),
            StationGroup::Water => partition.water.push(station),
        }
    }
    partition
}

/// Dashed line between two consecutive stations of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipLine {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub color: &'static str,
    pub dash_array: &'static str,
}

pub fn relationship_lines(partition: &Partition<'_>) -> Vec<RelationshipLine> {
    // ---
    let chain = |group: StationGroup, stations: &[&Station]| {
        stations
            .windows(2)
            .map(|pair| RelationshipLine {
                from: pair[0].location,
                to: pair[1].location,
                color: group.line_color(),
                dash_array: "5, 5",
            })
            .collect::<Vec<_>>()
    };

    let mut lines = chain(StationGroup::Weather, &partition.weather);
    lines.extend(chain(StationGroup::Water, &partition.water));
    lines
}

/// Everything the page script needs to draw one station.
#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub position: GeoPoint,
    pub group: StationGroup,
    pub status: StationStatus,
    pub color: &'static str,
    /// Online stations get a pulsing ring in their group color.
    pub pulse: Option<&'static str>,
    pub popup_html: String,
}

impl MapMarker {
    pub fn new(station: &Station, group: StationGroup) -> Self {
        // ---
        Self {
            id: station.id.clone(),
            position: station.location,
            group,
            status: station.status,
            color: station.status.marker_color(),
            pulse: station.status.pulses().then(|| group.line_color()),
            popup_html: station_popup(station, group).into_string(),
        }
    }
}

/// Serialized map payload for the page script.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    pub lines: Vec<RelationshipLine>,
}

impl MapView {
    pub fn build(stations: &[Station], grouping: Grouping, center: GeoPoint) -> Self {
        // ---
        let partition = partition_stations(stations, grouping);
        let lines = relationship_lines(&partition);

        let markers = partition
            .weather
            .iter()
            .map(|s| MapMarker::new(s, StationGroup::Weather))
            .chain(
                partition
                    .water
                    .iter()
                    .map(|s| MapMarker::new(s, StationGroup::Water)),
            )
            .collect();

        Self {
            center,
            zoom: 8,
            markers,
            lines,
        }
    }
}

pub fn status_badge(status: StationStatus) -> Markup {
    // ---
    html! {
        span class={ "badge " (status.badge_class()) } {
            span.pip.pulse[status.pulses()] {}
            span { (status.label()) }
        }
    }
}

pub fn details_href(station_id: &str) -> String {
    format!("/stations/details/{}", station_id)
}

pub fn logs_href(station_id: &str) -> String {
    format!("/stations/sensor-logs/{}", station_id)
}

fn reading(label: &str, value: String, unit: &str) -> Markup {
    // ---
    html! {
        div.reading {
            div.label { (label) }
            div.value { (value) " " (unit) }
        }
    }
}

/// Detail popup for one station.
pub fn station_popup(station: &Station, group: StationGroup) -> Markup {
    // ---
    let s = &station.sensors;
    let updated = station
        .last_updated
        .with_timezone(&Local)
        .format("%b %d, %H:%M")
        .to_string();

    html! {
        div.station-popup {
            div class={ "popup-head " (group.css_class()) } {
                div.popup-title {
                    h3 { (station.name) }
                    (status_badge(station.status))
                }
                div.popup-meta {
                    span { "🕒 " (updated) }
                    span.popup-tag { (group.model_tag()) }
                }
            }
            div.popup-body {
                @match group {
                    StationGroup::Weather => {
                        div.reading-grid {
                            (reading("Temperature", format!("{:.1}", s.temperature), "°C"))
                            (reading("ET₀", format!("{:.2}", s.et0), "mm"))
                            (reading("Wind Speed", format!("{:.1}", s.wind_speed), "m/s"))
                            (reading("Solar Radiation", format!("{:.0}", s.solar_radiation), "W/m²"))
                        }
                    }
                    StationGroup::Water => {
                        div.reading-grid {
                            (reading("Rainfall", format!("{:.2}", s.rainfall), "mm"))
                            (reading("Water Level", format!("{:.2}", s.water_level), "m"))
                        }
                        div.reading {
                            div.label { "Rainfall Summary" }
                            div.reading-grid {
                                (reading("Hourly", format!("{:.2}", s.rainfall * 0.2), "mm"))
                                (reading("Daily", format!("{:.2}", s.rainfall), "mm"))
                            }
                        }
                    }
                }
                div.popup-actions {
                    a.button href=(details_href(&station.id)) { "Details" }
                    a.button.outline href=(logs_href(&station.id)) { "Logs" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::sensors::tests::station;

    fn stations(n: usize) -> Vec<Station> {
        // ---
        (0..n)
            .map(|i| {
                let mut s = station(&format!("s{}", i), StationStatus::Online, 4.0);
                s.location = GeoPoint {
                    lat: 16.0 + i as f64,
                    lng: 104.0,
                };
                s
            })
            .collect()
    }

    fn ids<'a>(group: &[&'a Station]) -> Vec<&'a str> {
        group.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_alternating_partition_keeps_order() {
        // ---
        let all = stations(5);
        let partition = partition_stations(&all, Grouping::default());

        assert_eq!(ids(&partition.weather), vec!["s0", "s2", "s4"]);
        assert_eq!(ids(&partition.water), vec!["s1", "s3"]);
    }

    #[test]
    fn test_lines_chain_consecutive_group_members() {
        // ---
        let all = stations(5);
        let lines = relationship_lines(&partition_stations(&all, Grouping::default()));

        // 3 weather stations -> 2 lines, 2 water stations -> 1 line.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].from.lat, 16.0);
        assert_eq!(lines[0].to.lat, 18.0);
        assert_eq!(lines[1].to.lat, 20.0);
        assert_eq!(lines[0].color, "#f97316");
        assert_eq!(lines[2].color, "#3b82f6");
        assert_eq!(lines[2].from.lat, 17.0);
        assert!(lines.iter().all(|l| l.dash_array == "5, 5"));
    }

    #[test]
    fn test_no_lines_for_tiny_groups() {
        // ---
        assert!(relationship_lines(&partition_stations(&[], Grouping::default())).is_empty());
        assert!(relationship_lines(&partition_stations(&stations(2), Grouping::default())).is_empty());
    }

    #[test]
    fn test_marker_color_and_pulse_follow_status() {
        // ---
        let mut s = station("w", StationStatus::Warning, 4.0);
        let marker = MapMarker::new(&s, StationGroup::Weather);
        assert_eq!(marker.color, "#f59e0b");
        assert_eq!(marker.pulse, None);

        s.status = StationStatus::Online;
        let marker = MapMarker::new(&s, StationGroup::Water);
        assert_eq!(marker.color, "#22c55e");
        assert_eq!(marker.pulse, Some("#3b82f6"));
    }

    #[test]
    fn test_weather_popup_contents() {
        // ---
        let s = station("station-7", StationStatus::Critical, 4.456);
        let html = station_popup(&s, StationGroup::Weather).into_string();

        assert!(html.contains(&s.name));
        assert!(html.contains("badge-critical"));
        assert!(html.contains("Critical"));
        assert!(html.contains("ISMMA2300"));
        assert!(html.contains("4.46 mm"));
        assert!(html.contains("610 W/m²"));
        assert!(html.contains(r#"href="/stations/details/station-7""#));
        assert!(html.contains(r#"href="/stations/sensor-logs/station-7""#));
    }

    #[test]
    fn test_water_popup_rainfall_summary() {
        // ---
        let s = station("station-8", StationStatus::Offline, 5.0);
        let html = station_popup(&s, StationGroup::Water).into_string();

        // rainfall = 10.0 in the test fixture
        assert!(html.contains("DQA230.1"));
        assert!(html.contains("Rainfall Summary"));
        assert!(html.contains("2.00 mm"));
        assert!(html.contains("10.00 mm"));
        assert!(html.contains("1.25 m"));
        assert!(!html.contains("ISMMA2300"));
    }

    #[test]
    fn test_map_view_has_one_marker_per_station() {
        // ---
        let all = stations(4);
        let view = MapView::build(
            &all,
            Grouping::default(),
            GeoPoint {
                lat: 16.5434,
                lng: 104.7235,
            },
        );

        assert_eq!(view.markers.len(), 4);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.zoom, 8);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["markers"][0]["group"], "weather");
        assert_eq!(json["lines"][0]["dash_array"], "5, 5");
    }
}
