use chrono::{DateTime, Duration, Utc};

use super::value_objects::Email;

/// An authenticated session issued by the identity provider.
#[derive(Debug, Clone)]
pub struct Session {
    pub uid: String,
    pub email: Email,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Builds a session whose token lifetime starts now.
    pub fn issued_now(
        uid: String,
        email: Email,
        id_token: String,
        refresh_token: String,
        expires_in_secs: i64,
    ) -> Self {
        Self {
            uid,
            email,
            id_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }
}
