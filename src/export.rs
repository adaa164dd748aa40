//! CSV export of the current station set.

use anyhow::Result;

use crate::Station;

// ---

const HEADER: [&str; 13] = [
    "id",
    "name",
    "status",
    "latitude",
    "longitude",
    "last_updated",
    "temperature",
    "humidity",
    "wind_speed",
    "solar_radiation",
    "et0",
    "rainfall",
    "water_level",
];

/// Serialize stations as CSV with a header row, one row per station.
pub fn stations_to_csv(stations: &[Station]) -> Result<Vec<u8>> {
    // ---
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)?;

    for s in stations {
        wtr.write_record([
            s.id.clone(),
            s.name.clone(),
            s.status.as_str().to_string(),
            format!("{:.6}", s.location.lat),
            format!("{:.6}", s.location.lng),
            s.last_updated.to_rfc3339(),
            format!("{:.1}", s.sensors.temperature),
            format!("{:.1}", s.sensors.humidity),
            format!("{:.1}", s.sensors.wind_speed),
            format!("{:.0}", s.sensors.solar_radiation),
            format!("{:.2}", s.sensors.et0),
            format!("{:.2}", s.sensors.rainfall),
            format!("{:.2}", s.sensors.water_level),
        ])?;
    }

    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}
