//! Shared application state handed to every route.

use std::sync::Arc;

use crate::{
    session::SessionTiming, AlertFeed, AlertSource, Config, SessionRegistry, StationSource,
    StyleRegistry,
};

// ---

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub stations: Arc<dyn StationSource>,
    pub alerts: Arc<dyn AlertSource>,
    pub sessions: SessionRegistry,
    pub styles: StyleRegistry,
}

impl AppState {
    pub fn new(
        config: Config,
        stations: Arc<dyn StationSource>,
        alerts: Arc<dyn AlertSource>,
    ) -> Self {
        // ---
        let styles = StyleRegistry::new();
        let sessions = SessionRegistry::new(styles.clone(), SessionTiming::from(&config));
        Self {
            config: Arc::new(config),
            stations,
            alerts,
            sessions,
            styles,
        }
    }

    /// Current alerts, most recent first.
    pub fn alert_feed(&self) -> AlertFeed {
        AlertFeed::from_source(self.alerts.as_ref())
    }
}
