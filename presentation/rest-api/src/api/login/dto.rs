use poem_openapi::Object;

use business::domain::auth::model::Session;

#[derive(Object, Debug)]
pub struct LoginRequest {
    pub email: String,
    #[oai(write_only)]
    pub password: String,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Expiry of `idToken`, RFC 3339
    pub expires_at: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            uid: session.uid,
            email: session.email.to_string(),
            id_token: session.id_token,
            refresh_token: session.refresh_token,
            expires_at: session.expires_at.to_rfc3339(),
        }
    }
}
