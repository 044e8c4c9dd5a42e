use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::auth::errors::AuthError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for AuthError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name) = match &self {
            AuthError::InvalidEmail | AuthError::PasswordEmpty => {
                (StatusCode::BAD_REQUEST, "ValidationError")
            }
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "AuthenticationError"),
            AuthError::ProviderUnavailable => (StatusCode::BAD_GATEWAY, "UpstreamError"),
        };

        (status, ErrorResponse::json(name, &self.to_string()))
    }
}
