//! Synthetic per-station history.
//!
//! Stands in for a real history backend: one [`HistoricalPoint`] per calendar
//! day, ascending, ending at the requested date. Values are a per-station
//! baseline plus random jitter, so only length and date spacing are exact.

use chrono::{Duration, Local, NaiveDate};
use rand::Rng;

use crate::HistoricalPoint;

// ---

/// Baseline readings around which daily values are jittered.
struct Baseline {
    et0: f64,
    rainfall: f64,
    water_level: f64,
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    solar_radiation: f64,
}

/// Derive a stable per-station offset in `[0, 1)` from the station id.
fn station_offset(station_id: &str) -> f64 {
    // ---
    let hash = station_id
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    f64::from(hash % 1000) / 1000.0
}

fn baseline_for(station_id: &str) -> Baseline {
    // ---
    let k = station_offset(station_id);
    Baseline {
        et0: 4.0 + k,
        rainfall: 2.0 + 3.0 * k,
        water_level: 1.5 + k,
        temperature: 26.0 + 4.0 * k,
        humidity: 65.0 + 10.0 * k,
        wind_speed: 2.5 + 2.0 * k,
        solar_radiation: 550.0 + 150.0 * k,
    }
}

/// Generate `days` points ending at today's local date.
pub fn generate_historical_data(station_id: &str, days: u32) -> Vec<HistoricalPoint> {
    // ---
    let today = Local::now().date_naive();
    generate_with_rng(station_id, days, today, &mut rand::rng())
}

/// Generate `days` points ending at `end`, drawing jitter from `rng`.
///
/// The first point is dated `end - (days - 1)`; zero days yields an empty
/// series.
pub fn generate_with_rng<R: Rng + ?Sized>(
    station_id: &str,
    days: u32,
    end: NaiveDate,
    rng: &mut R,
) -> Vec<HistoricalPoint> {
    // ---
    let base = baseline_for(station_id);

    (0..days)
        .rev()
        .map(|back| {
            let date = end - Duration::days(i64::from(back));
            HistoricalPoint {
                date,
                et0: (base.et0 + rng.random_range(-1.0..1.0)).max(0.0),
                rainfall: (base.rainfall + rng.random_range(-2.0..6.0)).max(0.0),
                water_level: (base.water_level + rng.random_range(-0.5..0.5)).max(0.0),
                temperature: base.temperature + rng.random_range(-3.0..3.0),
                humidity: (base.humidity + rng.random_range(-10.0..10.0)).clamp(0.0, 100.0),
                wind_speed: (base.wind_speed + rng.random_range(-1.5..1.5)).max(0.0),
                solar_radiation: (base.solar_radiation + rng.random_range(-150.0..150.0)).max(0.0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn end_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
    }

    #[test]
    fn test_length_matches_day_count() {
        // ---
        let mut rng = StdRng::seed_from_u64(7);
        for days in [0u32, 1, 7, 30, 366] {
            let series = generate_with_rng("station-1", days, end_date(), &mut rng);
            assert_eq!(series.len(), days as usize, "wrong length for {} days", days);
        }
    }

    #[test]
    fn test_dates_strictly_increase_one_day_apart() {
        // ---
        let mut rng = StdRng::seed_from_u64(42);
        let series = generate_with_rng("station-1", 30, end_date(), &mut rng);

        for pair in series.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
        assert_eq!(series.last().unwrap().date, end_date());
        // Crosses the February/March boundary.
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_values_stay_in_physical_ranges() {
        // ---
        let mut rng = StdRng::seed_from_u64(1);
        let series = generate_with_rng("station-9", 200, end_date(), &mut rng);

        for p in &series {
            assert!(p.et0 >= 0.0);
            assert!(p.rainfall >= 0.0);
            assert!(p.water_level >= 0.0);
            assert!((0.0..=100.0).contains(&p.humidity));
            assert!(p.wind_speed >= 0.0);
            assert!(p.solar_radiation >= 0.0);
        }
    }

    #[test]
    fn test_wrapper_ends_today() {
        // ---
        let series = generate_historical_data("station-1", 3);
        assert_eq!(series.len(), 3);
        assert_eq!(series[2].date, Local::now().date_naive());
    }
}
