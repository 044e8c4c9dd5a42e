use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{Object, OpenApi, payload::Json};
use serde::{Deserialize, Serialize};

use business::domain::health::model::HealthReport;
use business::domain::health::use_cases::check_readiness::CheckReadinessUseCase;

use crate::api::tags::ApiTags;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,
    /// Current server timestamp
    pub timestamp: String,
    /// Service version
    pub version: String,
}

/// Readiness report
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
#[serde(rename_all = "camelCase")]
#[oai(rename_all = "camelCase")]
pub struct ReadinessResponse {
    /// "ready" or "degraded"
    pub status: String,
    /// Realtime Database reachability: "reachable" or "unreachable"
    pub database: String,
    /// When the probe ran
    pub checked_at: String,
}

impl From<HealthReport> for ReadinessResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            status: report.status().to_string(),
            database: report.database.to_string(),
            checked_at: report.checked_at.to_rfc3339(),
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum ReadinessResult {
    #[oai(status = 200)]
    Ready(Json<ReadinessResponse>),
    #[oai(status = 503)]
    NotReady(Json<ReadinessResponse>),
}

/// Health API for liveness and readiness probes
///
/// Mounted under `/health`. The liveness check never touches Firebase; the
/// readiness check does.
pub struct HealthApi {
    readiness_use_case: Arc<dyn CheckReadinessUseCase>,
}

impl HealthApi {
    pub fn new(readiness_use_case: Arc<dyn CheckReadinessUseCase>) -> Self {
        Self { readiness_use_case }
    }
}

#[OpenApi]
impl HealthApi {
    /// Liveness check
    ///
    /// Returns the current status of the service.
    /// This endpoint is public and does not require authentication.
    ///
    /// ## Response
    /// - `status`: "healthy" if service is running
    /// - `timestamp`: Current server timestamp in ISO 8601 format
    /// - `version`: Service version from Cargo.toml
    #[oai(path = "/", method = "get", tag = "ApiTags::Health")]
    async fn health_check(&self) -> Json<HealthCheckResponse> {
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Readiness check
    ///
    /// Probes the Realtime Database. Answers 503 while it is unreachable so
    /// load balancers stop routing traffic here.
    #[oai(path = "/ready", method = "get", tag = "ApiTags::Health")]
    async fn readiness_check(&self) -> ReadinessResult {
        let report = self.readiness_use_case.execute().await;
        if report.is_ready() {
            ReadinessResult::Ready(Json(report.into()))
        } else {
            ReadinessResult::NotReady(Json(report.into()))
        }
    }
}
