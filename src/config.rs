//! Configuration loader for the `irrigation-dashboard` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Pages, timers and session handling read their
//! settings from the [`Config`] snapshot rather than calling `env::var`.
use std::{env, path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional floating point environment variable with a default value.
macro_rules! parse_env_f64 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Upper bound accepted for any history window, in days.
pub const MAX_HISTORY_DAYS: u32 = 366;

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// TCP port the HTTP server binds to.
    pub port: u16,

    /// Number of days of synthetic history rendered on the dashboard.
    pub history_days: u32,

    /// How many alerts the dashboard summary panel shows.
    pub recent_alert_limit: usize,

    /// Period of the clock tick pushed to mounted pages.
    pub clock_tick: Duration,

    /// Period of the highlight pulse.
    pub pulse_interval: Duration,

    /// How long the highlight stays on after each pulse.
    pub pulse_duration: Duration,

    /// Sessions never attached within this window are unmounted by the reaper.
    pub session_attach_timeout: Duration,

    /// Initial map center as (latitude, longitude).
    pub map_center: (f64, f64),

    /// Optional JSON file replacing the built-in station and alert fixtures.
    pub stations_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        // ---
        Self {
            port: 8080,
            history_days: 7,
            recent_alert_limit: 4,
            clock_tick: Duration::from_millis(1000),
            pulse_interval: Duration::from_millis(5000),
            pulse_duration: Duration::from_millis(1000),
            session_attach_timeout: Duration::from_secs(30),
            map_center: (16.5434, 104.7235),
            stations_file: None,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `DASHBOARD_PORT` – HTTP port (default: 8080)
/// - `HISTORY_DAYS` – dashboard history window (default: 7, max 366)
/// - `RECENT_ALERT_LIMIT` – alerts in the summary panel (default: 4)
/// - `CLOCK_TICK_MS`, `PULSE_INTERVAL_MS`, `PULSE_DURATION_MS` – page timers
/// - `SESSION_ATTACH_TIMEOUT_SECS` – unattached session lifetime (default: 30, non-zero)
/// - `MAP_CENTER_LAT`, `MAP_CENTER_LNG` – initial map center
/// - `STATIONS_FILE` – JSON fixture file with `stations` and `alerts`
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = Config::default();

    let port = parse_env_u32!("DASHBOARD_PORT", defaults.port as u32);
    let port = u16::try_from(port).map_err(|_| anyhow!("Invalid DASHBOARD_PORT: {}", port))?;

    let history_days = parse_env_u32!("HISTORY_DAYS", defaults.history_days);
    if history_days > MAX_HISTORY_DAYS {
        return Err(anyhow!(
            "Invalid HISTORY_DAYS: {} exceeds {}",
            history_days,
            MAX_HISTORY_DAYS
        ));
    }

    let recent_alert_limit =
        parse_env_u32!("RECENT_ALERT_LIMIT", defaults.recent_alert_limit as u32) as usize;

    let clock_tick_ms = parse_env_u32!("CLOCK_TICK_MS", 1000);
    let pulse_interval_ms = parse_env_u32!("PULSE_INTERVAL_MS", 5000);
    let pulse_duration_ms = parse_env_u32!("PULSE_DURATION_MS", 1000);
    if clock_tick_ms == 0 || pulse_interval_ms == 0 {
        return Err(anyhow!("CLOCK_TICK_MS and PULSE_INTERVAL_MS must be non-zero"));
    }
    if pulse_duration_ms >= pulse_interval_ms {
        return Err(anyhow!(
            "PULSE_DURATION_MS ({}) must be shorter than PULSE_INTERVAL_MS ({})",
            pulse_duration_ms,
            pulse_interval_ms
        ));
    }

    let attach_timeout_secs = parse_env_u32!("SESSION_ATTACH_TIMEOUT_SECS", 30);
    if attach_timeout_secs == 0 {
        return Err(anyhow!("SESSION_ATTACH_TIMEOUT_SECS must be non-zero"));
    }

    let lat = parse_env_f64!("MAP_CENTER_LAT", defaults.map_center.0);
    let lng = parse_env_f64!("MAP_CENTER_LNG", defaults.map_center.1);
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(anyhow!("Map center out of range: ({}, {})", lat, lng));
    }

    let stations_file = env::var("STATIONS_FILE").ok().map(PathBuf::from);

    Ok(Config {
        port,
        history_days,
        recent_alert_limit,
        clock_tick: Duration::from_millis(clock_tick_ms.into()),
        pulse_interval: Duration::from_millis(pulse_interval_ms.into()),
        pulse_duration: Duration::from_millis(pulse_duration_ms.into()),
        session_attach_timeout: Duration::from_secs(attach_timeout_secs.into()),
        map_center: (lat, lng),
        stations_file,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        let stations_file = self
            .stations_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<built-in fixtures>".to_string());

        tracing::info!("Configuration loaded:");
        tracing::info!("  DASHBOARD_PORT              : {}", self.port);
        tracing::info!("  HISTORY_DAYS                : {}", self.history_days);
        tracing::info!("  RECENT_ALERT_LIMIT          : {}", self.recent_alert_limit);
        tracing::info!("  CLOCK_TICK_MS               : {}", self.clock_tick.as_millis());
        tracing::info!("  PULSE_INTERVAL_MS           : {}", self.pulse_interval.as_millis());
        tracing::info!("  PULSE_DURATION_MS           : {}", self.pulse_duration.as_millis());
        tracing::info!(
            "  SESSION_ATTACH_TIMEOUT_SECS : {}",
            self.session_attach_timeout.as_secs()
        );
        tracing::info!(
            "  MAP_CENTER                  : {:.4}, {:.4}",
            self.map_center.0,
            self.map_center.1
        );
        tracing::info!("  STATIONS_FILE               : {}", stations_file);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_behaviour() {
        // ---
        let cfg = Config::default();

        assert_eq!(cfg.history_days, 7);
        assert_eq!(cfg.recent_alert_limit, 4);
        assert_eq!(cfg.clock_tick, Duration::from_secs(1));
        assert_eq!(cfg.pulse_interval, Duration::from_secs(5));
        assert_eq!(cfg.pulse_duration, Duration::from_secs(1));
        assert!(cfg.pulse_duration < cfg.pulse_interval);
        assert!(cfg.stations_file.is_none());
    }

    #[test]
    fn test_zero_attach_timeout_is_rejected() {
        // ---
        env::set_var("SESSION_ATTACH_TIMEOUT_SECS", "0");
        let zero = load_from_env();
        env::set_var("SESSION_ATTACH_TIMEOUT_SECS", "12");
        let twelve = load_from_env();
        env::remove_var("SESSION_ATTACH_TIMEOUT_SECS");

        let err = zero.err().expect("zero timeout must fail");
        assert!(err.to_string().contains("SESSION_ATTACH_TIMEOUT_SECS"));
        assert_eq!(twelve.unwrap().session_attach_timeout, Duration::from_secs(12));
    }
}
