use std::collections::HashSet;

use poem_openapi::{OpenApi, param::Query, payload::Json};
use serde_json::Value;

use firebase::FirebaseApp;
use firebase::database::DatabaseError;

use crate::api::admin::dto::AdminSummaryResponse;
use crate::api::error::ErrorResponse;
use crate::api::security::{FirebaseBearer, Principal};
use crate::api::tags::ApiTags;

/// Administrative interface. Every call needs a Firebase ID token whose UID
/// is on the admin allow-list.
pub struct AdminApi {
    firebase: FirebaseApp,
    allowed_uids: HashSet<String>,
}

impl AdminApi {
    pub fn new(firebase: FirebaseApp, allowed_uids: HashSet<String>) -> Self {
        Self {
            firebase,
            allowed_uids,
        }
    }

    fn authorize(&self, principal: &Principal) -> Result<(), Json<ErrorResponse>> {
        if self.allowed_uids.contains(&principal.uid) {
            Ok(())
        } else {
            tracing::warn!(uid = %principal.uid, "Refused admin access");
            Err(ErrorResponse::json("Forbidden", "admin.not_allowed"))
        }
    }
}

#[OpenApi]
impl AdminApi {
    /// Firebase connection summary
    #[oai(path = "/", method = "get", tag = "ApiTags::Admin")]
    async fn summary(&self, auth: FirebaseBearer) -> AdminSummaryResult {
        if let Err(json) = self.authorize(&auth.0) {
            return AdminSummaryResult::Forbidden(json);
        }

        AdminSummaryResult::Ok(Json(AdminSummaryResponse::new(
            self.firebase.summary(),
            auth.0.uid,
        )))
    }

    /// Read a database node
    ///
    /// Reads `path` from the Realtime Database with the caller's own token, so
    /// the database security rules still apply.
    #[oai(path = "/database", method = "get", tag = "ApiTags::Admin")]
    async fn read_node(&self, auth: FirebaseBearer, path: Query<Option<String>>) -> ReadNodeResult {
        if let Err(json) = self.authorize(&auth.0) {
            return ReadNodeResult::Forbidden(json);
        }

        let path = path.0.unwrap_or_default();
        let reference = self.firebase.database().reference(&path);

        match reference.get::<Value>(Some(&auth.0.token)).await {
            Ok(value) => ReadNodeResult::Ok(Json(value)),
            Err(DatabaseError::Rejected { status, message }) if status == 401 || status == 403 => {
                tracing::warn!(path = %reference.path(), "Database rules denied admin read: {message}");
                ReadNodeResult::Forbidden(ErrorResponse::json("Forbidden", "database.permission_denied"))
            }
            Err(err) => {
                tracing::error!(path = %reference.path(), "Admin database read failed: {err}");
                ReadNodeResult::BadGateway(ErrorResponse::json("UpstreamError", &err.to_string()))
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum AdminSummaryResult {
    #[oai(status = 200)]
    Ok(Json<AdminSummaryResponse>),
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum ReadNodeResult {
    #[oai(status = 200)]
    Ok(Json<Value>),
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),
    #[oai(status = 502)]
    BadGateway(Json<ErrorResponse>),
}
