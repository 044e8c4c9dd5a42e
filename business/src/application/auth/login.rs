use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::model::Session;
use crate::domain::auth::services::AuthenticationService;
use crate::domain::auth::use_cases::login::{LoginParams, LoginUseCase};
use crate::domain::auth::value_objects::{Email, Password};
use crate::domain::logger::Logger;

pub struct LoginUseCaseImpl {
    pub authenticator: Arc<dyn AuthenticationService>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl LoginUseCase for LoginUseCaseImpl {
    async fn execute(&self, params: LoginParams) -> Result<Session, AuthError> {
        let email = Email::parse(&params.email)?;
        let password = Password::new(params.password)?;

        self.logger
            .info(&format!("Signing in user: {}", email.masked()));

        match self.authenticator.sign_in(&email, &password).await {
            Ok(session) => {
                self.logger
                    .info(&format!("User signed in with uid: {}", session.uid));
                Ok(session)
            }
            Err(AuthError::InvalidCredentials) => {
                self.logger
                    .warn(&format!("Rejected credentials for user: {}", email.masked()));
                Err(AuthError::InvalidCredentials)
            }
            Err(err) => {
                self.logger
                    .error(&format!("Identity provider failed for {}: {}", email.masked(), err));
                Err(err)
            }
        }
    }
}
