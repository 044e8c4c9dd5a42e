use async_trait::async_trait;

use crate::domain::health::model::HealthReport;

#[async_trait]
pub trait CheckReadinessUseCase: Send + Sync {
    async fn execute(&self) -> HealthReport;
}
