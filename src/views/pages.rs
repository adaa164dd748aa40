//! Alert table and station list pages.

use chrono::Local;
use maud::{html, Markup};

use crate::{
    views::{
        dashboard::category_badge,
        map::{details_href, logs_href, status_badge},
    },
    Alert, Station,
};

// ---

pub fn alerts_page(alerts: &[Alert], pending: usize) -> Markup {
    // ---
    html! {
        div.page-head {
            h1 { "Alerts" }
            span.badge.badge-amber { (pending) " pending" }
        }
        div.card {
            @if alerts.is_empty() {
                div.card-body { p.muted { "No alerts." } }
            } @else {
                table.data {
                    thead {
                        tr {
                            th { "Raised" }
                            th { "Station" }
                            th { "Category" }
                            th { "Message" }
                            th { "Status" }
                        }
                    }
                    tbody {
                        @for alert in alerts {
                            tr.acknowledged[alert.acknowledged] {
                                td { (alert.raised_at.with_timezone(&Local).format("%b %d, %H:%M").to_string()) }
                                td { (alert.station_name) }
                                td { (category_badge(alert.category)) }
                                td { (alert.message) }
                                td {
                                    @if alert.acknowledged { span.muted { "Acknowledged" } }
                                    @else { span.strong { "Pending" } }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn station_list_page(stations: &[Station]) -> Markup {
    // ---
    html! {
        div.page-head {
            h1 { "Station List" }
            span.muted { (stations.len()) " stations" }
        }
        div.card {
            table.data {
                thead {
                    tr {
                        th { "Station" }
                        th { "Status" }
                        th { "ET₀ (mm)" }
                        th { "Rainfall (mm)" }
                        th { "Water Level (m)" }
                        th { "Last Updated" }
                        th {}
                    }
                }
                tbody {
                    @for station in stations {
                        tr {
                            td {
                                div.strong { (station.name) }
                                div.muted { (station.id) }
                            }
                            td { (status_badge(station.status)) }
                            td { (format!("{:.2}", station.sensors.et0)) }
                            td { (format!("{:.2}", station.sensors.rainfall)) }
                            td { (format!("{:.2}", station.sensors.water_level)) }
                            td { (station.last_updated.with_timezone(&Local).format("%b %d, %H:%M").to_string()) }
                            td {
                                a href=(details_href(&station.id)) { "Details" }
                                " · "
                                a href=(logs_href(&station.id)) { "Logs" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::{alerts::tests::alert, sensors::tests::station, StationStatus};

    #[test]
    fn test_alert_table_marks_acknowledged_rows() {
        // ---
        let alerts = vec![alert("a1", 1, false), alert("a2", 2, true)];
        let html = alerts_page(&alerts, 1).into_string();

        assert_eq!(html.matches("<tr").count(), 3);
        assert_eq!(html.matches(r#"class="acknowledged""#).count(), 1);
        assert!(html.contains("1 pending"));
        assert!(html.contains("badge-blue"));
    }

    #[test]
    fn test_empty_alert_table() {
        // ---
        let html = alerts_page(&[], 0).into_string();
        assert!(html.contains("No alerts."));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_station_list_links_and_badges() {
        // ---
        let stations = vec![
            station("station-1", StationStatus::Online, 4.1),
            station("station-4", StationStatus::Offline, 5.0),
        ];
        let html = station_list_page(&stations).into_string();

        assert!(html.contains("2 stations"));
        assert!(html.contains("badge-online"));
        assert!(html.contains("badge-offline"));
        assert!(html.contains(r#"href="/stations/details/station-4""#));
        assert!(html.contains(r#"href="/stations/sensor-logs/station-1""#));
        assert!(html.contains("4.10"));
    }
}
