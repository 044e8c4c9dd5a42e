use std::sync::Arc;

use logger::TracingLogger;

use business::application::auth::login::LoginUseCaseImpl;
use business::application::health::check_readiness::CheckReadinessUseCaseImpl;
use firebase::FirebaseApp;

use crate::api::admin::routes::AdminApi;
use crate::api::health::routes::HealthApi;
use crate::api::login::routes::LoginApi;
use crate::config::admin_config::AdminConfig;

/// Everything the route table mounts, built once at startup around the
/// shared Firebase handle.
pub struct DependencyContainer {
    pub firebase: FirebaseApp,
    pub admin_api: AdminApi,
    pub login_api: LoginApi,
    pub health_api: HealthApi,
}

impl DependencyContainer {
    pub fn new(firebase: FirebaseApp, admin: &AdminConfig) -> Self {
        // Infrastructure adapters
        let authenticator = Arc::new(firebase.auth());
        let database_probe = Arc::new(firebase.database());

        // Use cases
        let login_use_case = Arc::new(LoginUseCaseImpl {
            authenticator,
            logger: Arc::new(TracingLogger::new("auth")),
        });
        let readiness_use_case = Arc::new(CheckReadinessUseCaseImpl {
            probe: database_probe,
            logger: Arc::new(TracingLogger::new("health")),
        });

        Self {
            admin_api: AdminApi::new(firebase.clone(), admin.allowed_uids.clone()),
            login_api: LoginApi::new(login_use_case),
            health_api: HealthApi::new(readiness_use_case),
            firebase,
        }
    }
}
