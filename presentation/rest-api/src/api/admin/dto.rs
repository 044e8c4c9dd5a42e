use poem_openapi::Object;

use firebase::client::AppSummary;

/// What the admin console shows about the Firebase connection.
/// The API key is redacted.
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct AdminSummaryResponse {
    pub project_id: String,
    pub auth_domain: String,
    pub database_url: String,
    pub api_key: String,
    pub signed_in_uid: String,
}

impl AdminSummaryResponse {
    pub fn new(summary: AppSummary, signed_in_uid: String) -> Self {
        Self {
            project_id: summary.project_id,
            auth_domain: summary.auth_domain,
            database_url: summary.database_url,
            api_key: summary.api_key,
            signed_in_uid,
        }
    }
}
