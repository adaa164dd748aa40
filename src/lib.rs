//! Server-rendered monitoring dashboard for irrigation sensor stations.
//!
//! Pages are rendered with `maud` and served by `axum`. Live behaviour
//! (clock, highlight pulse, injected map styles) lives in server-side page
//! sessions that are torn down by `Drop` when the page goes away.
//!
//! Modules follow the Explicit Module Boundary Pattern: siblings import
//! shared types from the crate root re-exports below, never from each other's
//! internals.

use axum::Router;

pub mod alerts;
pub mod config;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod history;
pub mod models;
pub mod sensors;
pub mod session;
pub mod state;
pub mod styles;
pub mod timer;
pub mod views;

mod routes;

pub use alerts::{AlertFeed, AlertSource};
pub use config::Config;
pub use error::{ApiError, AppError};
pub use fixtures::MockFeed;
pub use models::{
    series_of, Alert, AlertCategory, ChartPoint, GeoPoint, HistoricalPoint, Metric, SensorBundle,
    Station, StationStatus,
};
pub use sensors::{SensorSnapshot, StationSource};
pub use session::{PageKind, SessionId, SessionRegistry};
pub use state::AppState;
pub use styles::{StyleGuard, StyleRegistry};
pub use timer::ScopedTimer;

// ---

/// Build the full application router from the routes gateway.
pub fn app(state: AppState) -> Router {
    routes::router(state)
}
