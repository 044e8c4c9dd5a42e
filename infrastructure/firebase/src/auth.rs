use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use business::domain::auth::errors::AuthError;
use business::domain::auth::model::Session;
use business::domain::auth::services::AuthenticationService;
use business::domain::auth::value_objects::{Email, Password};

/// Email/password sign-in against the Identity Toolkit REST API.
#[derive(Clone)]
pub struct FirebaseAuth {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseAuth {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Returns the password sign-in endpoint URL.
    pub fn sign_in_url(&self) -> String {
        format!(
            "{}/accounts:signInWithPassword?key={}",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }
}

/// Identity Toolkit answers bad credentials with HTTP 400 and a code such as
/// `INVALID_PASSWORD` or `INVALID_LOGIN_CREDENTIALS : ...`.
fn classify_failure(body: &str) -> AuthError {
    let code = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_default();
    let code = code.split(':').next().unwrap_or_default().trim();

    match code {
        "EMAIL_NOT_FOUND"
        | "INVALID_PASSWORD"
        | "INVALID_LOGIN_CREDENTIALS"
        | "INVALID_EMAIL"
        | "USER_DISABLED"
        | "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::InvalidCredentials,
        _ => AuthError::ProviderUnavailable,
    }
}

/// Token lifetime in seconds, sent by Identity Toolkit as a decimal string.
fn parse_expires_in(raw: &str) -> Result<i64, AuthError> {
    match raw.trim().parse::<i64>() {
        Ok(seconds) if seconds > 0 => Ok(seconds),
        _ => {
            warn!(expires_in = raw, "Identity Toolkit returned an unusable token lifetime");
            Err(AuthError::ProviderUnavailable)
        }
    }
}

#[async_trait]
impl AuthenticationService for FirebaseAuth {
    async fn sign_in(&self, email: &Email, password: &Password) -> Result<Session, AuthError> {
        let body = json!({
            "email": email.as_str(),
            "password": password.expose(),
            "returnSecureToken": true,
        });

        let response = self
            .client
            .post(self.sign_in_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Identity Toolkit request failed: {e}");
                AuthError::ProviderUnavailable
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!("Identity Toolkit response unreadable: {e}");
            AuthError::ProviderUnavailable
        })?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Identity Toolkit rejected sign-in");
            return Err(classify_failure(&text));
        }

        let parsed: SignInResponse = serde_json::from_str(&text).map_err(|e| {
            warn!("Identity Toolkit response malformed: {e}");
            AuthError::ProviderUnavailable
        })?;
        let expires_in = parse_expires_in(&parsed.expires_in)?;

        Ok(Session::issued_now(
            parsed.local_id,
            email.clone(),
            parsed.id_token,
            parsed.refresh_token,
            expires_in,
        ))
    }
}
