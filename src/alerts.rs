//! Alert feed facade.

use crate::Alert;

// ---

/// Seam to whatever supplies alert records.
pub trait AlertSource: Send + Sync {
    fn alerts(&self) -> Vec<Alert>;
}

/// Alerts ordered most-recent-first.
///
/// Ordering is a stable sort on `raised_at`, so alerts raised at the same
/// instant keep their supplied order and repeated reads agree.
#[derive(Debug, Clone, Default)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
}

impl AlertFeed {
    pub fn new(mut alerts: Vec<Alert>) -> Self {
        // ---
        alerts.sort_by(|a, b| b.raised_at.cmp(&a.raised_at));
        Self { alerts }
    }

    pub fn from_source(source: &dyn AlertSource) -> Self {
        Self::new(source.alerts())
    }

    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    /// Alerts not yet acknowledged by an operator.
    pub fn pending_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.acknowledged).count()
    }

    /// The `limit` most recent alerts.
    pub fn recent(&self, limit: usize) -> &[Alert] {
        &self.alerts[..limit.min(self.alerts.len())]
    }
}
