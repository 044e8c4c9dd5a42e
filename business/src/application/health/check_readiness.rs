use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::health::model::{ComponentStatus, HealthReport};
use crate::domain::health::services::DatabaseProbe;
use crate::domain::health::use_cases::check_readiness::CheckReadinessUseCase;
use crate::domain::logger::Logger;

pub struct CheckReadinessUseCaseImpl {
    pub probe: Arc<dyn DatabaseProbe>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl CheckReadinessUseCase for CheckReadinessUseCaseImpl {
    async fn execute(&self) -> HealthReport {
        let database = match self.probe.ping().await {
            Ok(()) => ComponentStatus::Reachable,
            Err(reason) => {
                self.logger
                    .warn(&format!("Database readiness probe failed: {}", reason));
                ComponentStatus::Unreachable
            }
        };

        HealthReport {
            database,
            checked_at: Utc::now(),
        }
    }
}
