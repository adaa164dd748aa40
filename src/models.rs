//! Data models for stations, alerts and historical series.
//!
//! Status and category enums are closed: every display attribute is an
//! exhaustive `match`, so a new variant fails to compile until it has a
//! color, badge and label.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---

/// Operational status reported for a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Online,
    Warning,
    Offline,
    Critical,
}

impl StationStatus {
    /// Marker fill color on the map.
    pub fn marker_color(self) -> &'static str {
        // ---
        match self {
            StationStatus::Online => "#22c55e",
            StationStatus::Warning => "#f59e0b",
            StationStatus::Offline => "#ef4444",
            StationStatus::Critical => "#3b82f6",
        }
    }

    pub fn badge_class(self) -> &'static str {
        // ---
        match self {
            StationStatus::Online => "badge-online",
            StationStatus::Warning => "badge-warning",
            StationStatus::Offline => "badge-offline",
            StationStatus::Critical => "badge-critical",
        }
    }

    pub fn label(self) -> &'static str {
        // ---
        match self {
            StationStatus::Online => "Online",
            StationStatus::Warning => "Warning",
            StationStatus::Offline => "Offline",
            StationStatus::Critical => "Critical",
        }
    }

    /// Online stations get a pulsing ring on the map.
    pub fn pulses(self) -> bool {
        matches!(self, StationStatus::Online)
    }

    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            StationStatus::Online => "online",
            StationStatus::Warning => "warning",
            StationStatus::Offline => "offline",
            StationStatus::Critical => "critical",
        }
    }
}

/// WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Current readings of every sensor on a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorBundle {
    // ---
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub solar_radiation: f64,
    pub et0: f64,
    pub rainfall: f64,
    pub water_level: f64,
}

/// A station as supplied by the station collaborator. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    // ---
    pub id: String,
    pub name: String,
    pub status: StationStatus,
    pub location: GeoPoint,
    pub last_updated: DateTime<Utc>,
    pub sensors: SensorBundle,
}

/// Alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Offline,
    Weather,
    Other,
}

impl AlertCategory {
    pub fn badge_class(self) -> &'static str {
        // ---
        match self {
            AlertCategory::Offline => "badge-red",
            AlertCategory::Weather => "badge-amber",
            AlertCategory::Other => "badge-blue",
        }
    }

    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            AlertCategory::Offline => "offline",
            AlertCategory::Weather => "weather",
            AlertCategory::Other => "other",
        }
    }
}

/// An alert raised against a station, referenced by display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    // ---
    pub id: String,
    pub station_name: String,
    pub category: AlertCategory,
    pub message: String,
    pub raised_at: DateTime<Utc>,
    #[serde(default)]
    pub acknowledged: bool,
}

/// One sampled day of every tracked metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    // ---
    pub date: NaiveDate,
    pub et0: f64,
    pub rainfall: f64,
    pub water_level: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub solar_radiation: f64,
}

/// Metrics carried by a [`HistoricalPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Et0,
    Rainfall,
    WaterLevel,
    Temperature,
    Humidity,
    WindSpeed,
    SolarRadiation,
}

impl Metric {
    pub fn value_of(self, point: &HistoricalPoint) -> f64 {
        // ---
        match self {
            Metric::Et0 => point.et0,
            Metric::Rainfall => point.rainfall,
            Metric::WaterLevel => point.water_level,
            Metric::Temperature => point.temperature,
            Metric::Humidity => point.humidity,
            Metric::WindSpeed => point.wind_speed,
            Metric::SolarRadiation => point.solar_radiation,
        }
    }
}

/// A single chart sample. `None` means no data for that date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Project one metric out of a historical series, preserving order.
pub fn series_of(history: &[HistoricalPoint], metric: Metric) -> Vec<ChartPoint> {
    // ---
    history
        .iter()
        .map(|p| ChartPoint {
            date: p.date,
            value: Some(metric.value_of(p)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_status_round_trips_lowercase() {
        // ---
        let json = serde_json::to_string(&StationStatus::Warning).unwrap();
        assert_eq!(json, "\"warning\"");

        let parsed: StationStatus = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(parsed, StationStatus::Critical);

        assert!(serde_json::from_str::<StationStatus>("\"sleeping\"").is_err());
    }

    #[test]
    fn test_status_colors() {
        // ---
        assert_eq!(StationStatus::Online.marker_color(), "#22c55e");
        assert_eq!(StationStatus::Warning.marker_color(), "#f59e0b");
        assert_eq!(StationStatus::Offline.marker_color(), "#ef4444");
        assert_eq!(StationStatus::Critical.marker_color(), "#3b82f6");
        assert!(StationStatus::Online.pulses());
        assert!(!StationStatus::Critical.pulses());
    }

    #[test]
    fn test_alert_acknowledged_defaults_to_false() {
        // ---
        let alert: Alert = serde_json::from_str(
            r#"{
                "id": "a-1",
                "station_name": "North Canal",
                "category": "weather",
                "message": "Heavy rain expected",
                "raised_at": "2025-03-26T18:45:00Z"
            }"#,
        )
        .unwrap();

        assert!(!alert.acknowledged);
        assert_eq!(alert.category, AlertCategory::Weather);
        assert_eq!(alert.category.badge_class(), "badge-amber");
    }

    #[test]
    fn test_series_of_projects_metric_in_order() {
        // ---
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        let point = |d, et0| HistoricalPoint {
            date: day(d),
            et0,
            rainfall: 0.0,
            water_level: 1.0,
            temperature: 25.0,
            humidity: 60.0,
            wind_speed: 3.0,
            solar_radiation: 500.0,
        };
        let history = vec![point(1, 4.1), point(2, 4.5)];

        let series = series_of(&history, Metric::Et0);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, day(1));
        assert_eq!(series[0].value, Some(4.1));
        assert_eq!(series[1].value, Some(4.5));
    }
}
