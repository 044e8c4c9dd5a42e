use async_trait::async_trait;

use super::errors::AuthError;
use super::model::Session;
use super::value_objects::{Email, Password};

/// Port for the identity provider that verifies email/password credentials.
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    async fn sign_in(&self, email: &Email, password: &Password) -> Result<Session, AuthError>;
}
