use poem::endpoint::BoxEndpoint;
use poem::{EndpointExt, IntoEndpoint, Route};
use poem_openapi::OpenApiService;
use tracing::{info, warn};

use crate::api::admin::routes::AdminApi;
use crate::api::health::routes::HealthApi;
use crate::api::login::routes::LoginApi;
use crate::api::security::TokenAudience;
use crate::setup::dependency_injection::DependencyContainer;

/// Builds a secondary route table mounted below an [`RouteTarget::Include`] entry.
pub type SubTable = fn() -> Route;

#[derive(Debug, Clone, Copy)]
pub enum RouteTarget {
    Admin,
    Login,
    HealthCheck,
    Include(SubTable),
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub name: &'static str,
    pub prefix: String,
    pub target: RouteTarget,
}

/// Ordered prefix table. The first entry whose prefix matches a path handles
/// it; later entries are never consulted.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admin under `admin_prefix`, then login, health, and the application
    /// routes as catch-all.
    pub fn standard(admin_prefix: &str) -> Self {
        Self::new()
            .mount("admin", admin_prefix, RouteTarget::Admin)
            .mount("login", "/login", RouteTarget::Login)
            .mount("health_check", "/health", RouteTarget::HealthCheck)
            .mount("app", "/", RouteTarget::Include(crate::api::app::routes::routes))
    }

    pub fn mount(mut self, name: &'static str, prefix: &str, target: RouteTarget) -> Self {
        self.entries.push(RouteEntry {
            name,
            prefix: normalize_prefix(prefix),
            target,
        });
        self
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        self.entries
            .iter()
            .find(|entry| prefix_matches(&entry.prefix, path))
    }

    /// Registers the entries with the router in declaration order.
    ///
    /// The router prefers the most specific prefix, so an entry that an
    /// earlier one already covers is left out to keep first-match semantics.
    pub fn into_route(self, container: DependencyContainer) -> Route {
        let mut mounts = Mounts::from(container);
        let mut route = Route::new();

        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(earlier) = self.entries[..index]
                .iter()
                .find(|earlier| prefix_matches(&earlier.prefix, &entry.prefix))
            {
                warn!(
                    route = entry.name,
                    prefix = %entry.prefix,
                    shadowed_by = earlier.name,
                    "Route unreachable, skipping"
                );
                continue;
            }

            let Some(endpoint) = mounts.endpoint(entry.target) else {
                warn!(route = entry.name, "Handler already mounted, skipping");
                continue;
            };

            info!(route = entry.name, prefix = %entry.prefix, "Mounting route");
            route = route.nest(entry.prefix.as_str(), endpoint);
        }

        route
    }
}

/// Handlers waiting to be mounted. Each one can be mounted once.
struct Mounts {
    admin: Option<AdminApi>,
    login: Option<LoginApi>,
    health: Option<HealthApi>,
    project_id: String,
}

impl From<DependencyContainer> for Mounts {
    fn from(container: DependencyContainer) -> Self {
        Self {
            project_id: container.firebase.project_id().to_string(),
            admin: Some(container.admin_api),
            login: Some(container.login_api),
            health: Some(container.health_api),
        }
    }
}

impl Mounts {
    fn endpoint(&mut self, target: RouteTarget) -> Option<BoxEndpoint<'static>> {
        let version = env!("CARGO_PKG_VERSION");
        match target {
            RouteTarget::Admin => self.admin.take().map(|api| {
                OpenApiService::new(api, "Admin", version)
                    .into_endpoint()
                    .data(TokenAudience(self.project_id.clone()))
                    .map_to_response()
                    .boxed()
            }),
            RouteTarget::Login => self.login.take().map(|api| {
                OpenApiService::new(api, "Login", version)
                    .into_endpoint()
                    .map_to_response()
                    .boxed()
            }),
            RouteTarget::HealthCheck => self.health.take().map(|api| {
                OpenApiService::new(api, "Health", version)
                    .into_endpoint()
                    .map_to_response()
                    .boxed()
            }),
            RouteTarget::Include(sub_table) => Some(sub_table().boxed()),
        }
    }
}

/// `"login/"` and `"/login"` both become `"/login"`; empty becomes `"/"`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    format!("/{}", trimmed)
}

/// Segment-aware prefix test: `/login` covers `/login`, `/login/` and
/// `/login/x`, but not `/loginx`. `/` covers everything.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use serde_json::json;

    use business::domain::auth::errors::AuthError;
    use business::domain::auth::model::Session;
    use business::domain::auth::use_cases::login::{LoginParams, LoginUseCase};
    use business::domain::auth::value_objects::Email;
    use business::domain::health::model::{ComponentStatus, HealthReport};
    use business::domain::health::use_cases::check_readiness::CheckReadinessUseCase;
    use firebase::{FirebaseApp, FirebaseConfig};

    use super::*;

    const ADMIN: &str = "/kk-console-admin";

    fn table() -> RouteTable {
        RouteTable::standard(ADMIN)
    }

    fn target_name(path: &str) -> &'static str {
        table().resolve(path).map(|entry| entry.name).unwrap_or("none")
    }

    #[test]
    fn should_keep_declaration_order() {
        let names: Vec<&str> = table().entries().iter().map(|e| e.name).collect();

        assert_eq!(names, vec!["admin", "login", "health_check", "app"]);
    }

    #[test]
    fn should_resolve_admin_paths_only_to_admin() {
        for path in [ADMIN, "/kk-console-admin/", "/kk-console-admin/database"] {
            assert_eq!(target_name(path), "admin", "{path}");
        }
    }

    #[test]
    fn should_never_resolve_login_or_health_to_admin() {
        assert_eq!(target_name("/login"), "login");
        assert_eq!(target_name("/login/"), "login");
        assert_eq!(target_name("/health"), "health_check");
        assert_eq!(target_name("/health/ready"), "health_check");
    }

    #[test]
    fn should_use_catch_all_only_when_nothing_earlier_matches() {
        assert_eq!(target_name("/"), "app");
        assert_eq!(target_name("/docs"), "app");
        assert_eq!(target_name("/loginx"), "app");
        assert_eq!(target_name("/healthcheck"), "app");
        assert_eq!(target_name("/kk-console-administrator"), "app");
    }

    #[test]
    fn should_let_first_entry_win_on_overlap() {
        let table = RouteTable::new()
            .mount("first", "/login", RouteTarget::Login)
            .mount("second", "/login/", RouteTarget::HealthCheck);

        assert_eq!(table.resolve("/login/").map(|e| e.name), Some("first"));
    }

    #[test]
    fn should_resolve_nothing_without_catch_all() {
        let table = RouteTable::new().mount("login", "login/", RouteTarget::Login);

        assert_eq!(table.entries()[0].prefix, "/login");
        assert!(table.resolve("/elsewhere").is_none());
    }

    #[test]
    fn should_normalize_prefixes() {
        assert_eq!(normalize_prefix("login/"), "/login");
        assert_eq!(normalize_prefix("/health"), "/health");
        assert_eq!(normalize_prefix(""), "/");
        assert_eq!(normalize_prefix("/"), "/");
    }

    struct StubLogin;

    #[async_trait]
    impl LoginUseCase for StubLogin {
        async fn execute(&self, params: LoginParams) -> Result<Session, AuthError> {
            if params.password != "s3cret" {
                return Err(AuthError::InvalidCredentials);
            }
            Ok(Session::issued_now(
                "uid-42".to_string(),
                Email::parse(&params.email)?,
                "id-token".to_string(),
                "refresh-token".to_string(),
                3600,
            ))
        }
    }

    struct StubReadiness(ComponentStatus);

    #[async_trait]
    impl CheckReadinessUseCase for StubReadiness {
        async fn execute(&self) -> HealthReport {
            HealthReport {
                database: self.0,
                checked_at: Utc::now(),
            }
        }
    }

    fn firebase_app() -> FirebaseApp {
        let config = FirebaseConfig::from_lookup(|key| {
            Some(match key {
                "FIREBASE_DATABASE_URL" => "https://kwentas-default-rtdb.firebaseio.com".to_string(),
                "FIREBASE_PROJECT_ID" => "kwentas".to_string(),
                other => format!("value-of-{other}"),
            })
        })
        .unwrap();
        FirebaseApp::initialize(config).unwrap()
    }

    fn client(database: ComponentStatus) -> TestClient<Route> {
        let firebase = firebase_app();
        let container = DependencyContainer {
            admin_api: AdminApi::new(firebase.clone(), HashSet::from(["uid-42".to_string()])),
            login_api: LoginApi::new(Arc::new(StubLogin)),
            health_api: HealthApi::new(Arc::new(StubReadiness(database))),
            firebase,
        };
        TestClient::new(table().into_route(container))
    }

    #[tokio::test]
    async fn should_answer_liveness_check() {
        let cli = client(ComponentStatus::Reachable);

        let resp = cli.get("/health").send().await;

        resp.assert_status_is_ok();
        let json = resp.json().await;
        json.value().object().get("status").assert_string("healthy");
    }

    #[tokio::test]
    async fn should_answer_ready_when_database_is_reachable() {
        let cli = client(ComponentStatus::Reachable);

        let resp = cli.get("/health/ready").send().await;

        resp.assert_status_is_ok();
        let json = resp.json().await;
        json.value().object().get("database").assert_string("reachable");
        assert!(!json.value().object().get("checkedAt").string().is_empty());
    }

    #[tokio::test]
    async fn should_answer_service_unavailable_when_database_is_unreachable() {
        let cli = client(ComponentStatus::Unreachable);

        let resp = cli.get("/health/ready").send().await;

        resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let json = resp.json().await;
        json.value().object().get("status").assert_string("degraded");
    }

    #[tokio::test]
    async fn should_issue_session_on_login() {
        let cli = client(ComponentStatus::Reachable);

        let resp = cli
            .post("/login")
            .body_json(&json!({ "email": "maria@example.com", "password": "s3cret" }))
            .send()
            .await;

        resp.assert_status_is_ok();
        let json = resp.json().await;
        json.value().object().get("uid").assert_string("uid-42");
        json.value().object().get("idToken").assert_string("id-token");
        json.value().object().get("refreshToken").assert_string("refresh-token");
        json.value().object().get("email").assert_string("maria@example.com");
        assert!(!json.value().object().get("expiresAt").string().is_empty());
    }

    #[tokio::test]
    async fn should_reject_wrong_password_on_login() {
        let cli = client(ComponentStatus::Reachable);

        let resp = cli
            .post("/login")
            .body_json(&json!({ "email": "maria@example.com", "password": "nope" }))
            .send()
            .await;

        resp.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_reject_malformed_email_on_login() {
        let cli = client(ComponentStatus::Reachable);

        let resp = cli
            .post("/login")
            .body_json(&json!({ "email": "maria", "password": "s3cret" }))
            .send()
            .await;

        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_require_bearer_token_for_admin() {
        let cli = client(ComponentStatus::Reachable);

        let resp = cli.get(ADMIN).send().await;

        resp.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_serve_index_from_included_routes() {
        let cli = client(ComponentStatus::Reachable);

        let resp = cli.get("/").send().await;

        resp.assert_status_is_ok();
        let json = resp.json().await;
        json.value().object().get("name").assert_string("rest-api");
    }

    #[tokio::test]
    async fn should_not_route_lookalike_prefix_to_login() {
        let cli = client(ComponentStatus::Reachable);

        let resp = cli
            .post("/loginx")
            .body_json(&json!({ "email": "maria@example.com", "password": "s3cret" }))
            .send()
            .await;

        resp.assert_status(StatusCode::NOT_FOUND);
    }
}
