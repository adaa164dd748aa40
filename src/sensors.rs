//! Sensor aggregation facade.
//!
//! Read-only aggregates over the station snapshot supplied by the station
//! collaborator. Every aggregate is defined for an empty station set.

use serde::Serialize;

use crate::{Station, StationStatus};

// ---

/// Seam to whatever supplies the current station set.
pub trait StationSource: Send + Sync {
    fn stations(&self) -> Vec<Station>;
}

/// Mean of `field` over `stations`; `0.0` for an empty set.
pub fn average_of<F>(stations: &[Station], field: F) -> f64
where
    F: Fn(&Station) -> f64,
{
    // ---
    if stations.is_empty() {
        return 0.0;
    }
    stations.iter().map(field).sum::<f64>() / stations.len() as f64
}

/// Display formatting for aggregate readings (two decimals).
pub fn format_reading(value: f64) -> String {
    format!("{:.2}", value)
}

/// Current-snapshot aggregates shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    // ---
    pub station_count: usize,
    pub online_count: usize,
    pub average_et0: f64,
    pub average_rainfall: f64,
    pub average_water_level: f64,
}

impl SensorSnapshot {
    pub fn from_stations(stations: &[Station]) -> Self {
        // ---
        let online_count = stations
            .iter()
            .filter(|s| s.status == StationStatus::Online)
            .count();

        Self {
            station_count: stations.len(),
            online_count,
            average_et0: average_of(stations, |s| s.sensors.et0),
            average_rainfall: average_of(stations, |s| s.sensors.rainfall),
            average_water_level: average_of(stations, |s| s.sensors.water_level),
        }
    }
}
