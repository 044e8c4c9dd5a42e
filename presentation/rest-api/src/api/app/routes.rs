use poem::Route;
use poem_openapi::{Object, OpenApi, OpenApiService, payload::Json};

use crate::api::tags::ApiTags;

/// Service index
#[derive(Object, Debug)]
pub struct ServiceIndexResponse {
    pub name: String,
    pub version: String,
    pub docs: String,
}

pub struct AppApi;

#[OpenApi]
impl AppApi {
    /// Service index
    ///
    /// Names the service and points at its API documentation.
    #[oai(path = "/", method = "get", tag = "ApiTags::App")]
    async fn index(&self) -> Json<ServiceIndexResponse> {
        Json(ServiceIndexResponse {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            docs: "/docs".to_string(),
        })
    }
}

/// Application routes included at the root of the route table.
pub fn routes() -> Route {
    let api_service = OpenApiService::new(AppApi, "Kwentas Backend API", env!("CARGO_PKG_VERSION"));
    let ui = api_service.swagger_ui();
    let spec = api_service.spec_endpoint();

    Route::new()
        .nest("/docs", ui)
        .nest("/openapi.json", spec)
        .nest("/", api_service)
}
