//! Mock station and alert collaborators.
//!
//! The dashboard has no ingestion path. [`MockFeed`] plays the external
//! station and alert services, either from the built-in sample set or from a
//! JSON file named by `STATIONS_FILE`.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Deserialize;

use crate::{
    Alert, AlertCategory, AlertSource, GeoPoint, SensorBundle, Station, StationSource,
    StationStatus,
};

// ---

/// On-disk fixture layout.
#[derive(Debug, Deserialize)]
struct FixtureFile {
    stations: Vec<Station>,
    #[serde(default)]
    alerts: Vec<Alert>,
}

/// In-memory station and alert feed. Readings are jittered per read around
/// an unchanging base set.
pub struct MockFeed {
    base: Vec<Station>,
    alerts: Vec<Alert>,
    jitter: bool,
}

impl MockFeed {
    /// Built-in sample of five stations and six alerts.
    pub fn sample() -> Self {
        // ---
        Self {
            base: sample_stations(),
            alerts: sample_alerts(),
            jitter: true,
        }
    }

    /// Feed that always returns exactly what it was given.
    pub fn fixed(stations: Vec<Station>, alerts: Vec<Alert>) -> Self {
        // ---
        Self {
            base: stations,
            alerts,
            jitter: false,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        // ---
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stations file '{}'", path.display()))?;
        let fixture: FixtureFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse stations file '{}'", path.display()))?;

        tracing::info!(
            "Loaded {} stations and {} alerts from {}",
            fixture.stations.len(),
            fixture.alerts.len(),
            path.display()
        );

        Ok(Self {
            base: fixture.stations,
            alerts: fixture.alerts,
            jitter: true,
        })
    }
}

impl StationSource for MockFeed {
    fn stations(&self) -> Vec<Station> {
        // ---
        let mut stations = self.base.clone();

        if self.jitter {
            let mut rng = rand::rng();
            let now = Utc::now();
            for station in stations.iter_mut() {
                jitter_readings(&mut station.sensors, &mut rng);
                if station.status != StationStatus::Offline {
                    station.last_updated = now;
                }
            }
        }

        stations
    }
}

impl AlertSource for MockFeed {
    fn alerts(&self) -> Vec<Alert> {
        self.alerts.clone()
    }
}

/// Nudge each reading by a small random amount, staying in physical range.
/// Applied to a copy of the base readings, so offsets never accumulate.
fn jitter_readings<R: Rng + ?Sized>(s: &mut SensorBundle, rng: &mut R) {
    // ---
    s.temperature = (s.temperature + rng.random_range(-0.3..0.3)).clamp(-10.0, 50.0);
    s.humidity = (s.humidity + rng.random_range(-1.0..1.0)).clamp(0.0, 100.0);
    s.wind_speed = (s.wind_speed + rng.random_range(-0.2..0.2)).max(0.0);
    s.solar_radiation = (s.solar_radiation + rng.random_range(-10.0..10.0)).max(0.0);
    s.et0 = (s.et0 + rng.random_range(-0.05..0.05)).max(0.0);
    s.rainfall = (s.rainfall + rng.random_range(-0.1..0.1)).max(0.0);
    s.water_level = (s.water_level + rng.random_range(-0.02..0.02)).max(0.0);
}

fn sample_stations() -> Vec<Station> {
    // ---
    let now = Utc::now();
    let make = |id: &str,
                name: &str,
                status: StationStatus,
                lat: f64,
                lng: f64,
                minutes_ago: i64,
                sensors: SensorBundle| Station {
        id: id.to_string(),
        name: name.to_string(),
        status,
        location: GeoPoint { lat, lng },
        last_updated: now - Duration::minutes(minutes_ago),
        sensors,
    };

    vec![
        make(
            "station-1",
            "Nakhon Phanom Weather Station",
            StationStatus::Online,
            16.5434,
            104.7235,
            2,
            SensorBundle {
                temperature: 27.4,
                humidity: 72.0,
                wind_speed: 3.6,
                solar_radiation: 640.0,
                et0: 4.62,
                rainfall: 3.20,
                water_level: 1.82,
            },
        ),
        make(
            "station-2",
            "Mekong Riverside Gauge",
            StationStatus::Online,
            16.9012,
            104.6851,
            4,
            SensorBundle {
                temperature: 26.8,
                humidity: 78.5,
                wind_speed: 2.9,
                solar_radiation: 590.0,
                et0: 4.15,
                rainfall: 5.80,
                water_level: 3.46,
            },
        ),
        make(
            "station-3",
            "That Phanom Field Site",
            StationStatus::Warning,
            16.9437,
            104.7092,
            17,
            SensorBundle {
                temperature: 29.1,
                humidity: 61.0,
                wind_speed: 4.4,
                solar_radiation: 705.0,
                et0: 5.08,
                rainfall: 0.40,
                water_level: 0.95,
            },
        ),
        make(
            "station-4",
            "Renu Nakhon Canal Gate",
            StationStatus::Offline,
            17.0508,
            104.5567,
            185,
            SensorBundle {
                temperature: 25.9,
                humidity: 80.2,
                wind_speed: 1.8,
                solar_radiation: 410.0,
                et0: 3.62,
                rainfall: 7.10,
                water_level: 2.74,
            },
        ),
        make(
            "station-5",
            "Sakon Nakhon Reservoir Outlet",
            StationStatus::Online,
            17.1545,
            104.1348,
            1,
            SensorBundle {
                temperature: 28.2,
                humidity: 66.4,
                wind_speed: 3.2,
                solar_radiation: 655.0,
                et0: 4.81,
                rainfall: 1.30,
                water_level: 4.12,
            },
        ),
    ]
}

fn sample_alerts() -> Vec<Alert> {
    // ---
    let now = Utc::now();
    let make = |id: &str,
                station: &str,
                category: AlertCategory,
                message: &str,
                minutes_ago: i64,
                acknowledged: bool| Alert {
        id: id.to_string(),
        station_name: station.to_string(),
        category,
        message: message.to_string(),
        raised_at: now - Duration::minutes(minutes_ago),
        acknowledged,
    };

    vec![
        make(
            "alert-1",
            "Renu Nakhon Canal Gate",
            AlertCategory::Offline,
            "Station has not reported for more than 3 hours",
            175,
            false,
        ),
        make(
            "alert-2",
            "That Phanom Field Site",
            AlertCategory::Weather,
            "Wind gusts above 10 m/s recorded",
            12,
            false,
        ),
        make(
            "alert-3",
            "Mekong Riverside Gauge",
            AlertCategory::Weather,
            "Heavy rainfall expected in the next 24 hours",
            48,
            false,
        ),
        make(
            "alert-4",
            "Sakon Nakhon Reservoir Outlet",
            AlertCategory::Other,
            "Water level sensor calibration due",
            320,
            true,
        ),
        make(
            "alert-5",
            "Nakhon Phanom Weather Station",
            AlertCategory::Other,
            "Battery voltage below 11.8 V",
            95,
            false,
        ),
        make(
            "alert-6",
            "That Phanom Field Site",
            AlertCategory::Weather,
            "Soil moisture dropped below irrigation threshold",
            610,
            true,
        ),
    ]
}
