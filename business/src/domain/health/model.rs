use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reachability of a backing component as seen from this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Reachable,
    Unreachable,
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentStatus::Reachable => write!(f, "reachable"),
            ComponentStatus::Unreachable => write!(f, "unreachable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    pub database: ComponentStatus,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_ready(&self) -> bool {
        self.database == ComponentStatus::Reachable
    }

    pub fn status(&self) -> &'static str {
        if self.is_ready() { "ready" } else { "degraded" }
    }
}
