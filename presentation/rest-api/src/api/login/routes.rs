use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use business::domain::auth::use_cases::login::{LoginParams, LoginUseCase};

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::login::dto::{LoginRequest, SessionResponse};
use crate::api::tags::ApiTags;

pub struct LoginApi {
    login_use_case: Arc<dyn LoginUseCase>,
}

impl LoginApi {
    pub fn new(login_use_case: Arc<dyn LoginUseCase>) -> Self {
        Self { login_use_case }
    }
}

/// Authentication API
///
/// Mounted under `/login`.
#[OpenApi]
impl LoginApi {
    /// Sign in with email and password
    ///
    /// Exchanges credentials for a Firebase ID token and refresh token.
    #[oai(path = "/", method = "post", tag = "ApiTags::Auth")]
    async fn login(&self, body: Json<LoginRequest>) -> LoginResponse {
        let params = LoginParams {
            email: body.0.email,
            password: body.0.password,
        };

        match self.login_use_case.execute(params).await {
            Ok(session) => LoginResponse::Ok(Json(session.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => LoginResponse::BadRequest(json),
                    401 => LoginResponse::Unauthorized(json),
                    _ => LoginResponse::BadGateway(json),
                }
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum LoginResponse {
    #[oai(status = 200)]
    Ok(Json<SessionResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),
    #[oai(status = 502)]
    BadGateway(Json<ErrorResponse>),
}
