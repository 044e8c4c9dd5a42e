/// Authentication errors.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("auth.invalid_email")]
    InvalidEmail,
    #[error("auth.password_empty")]
    PasswordEmpty,
    #[error("auth.invalid_credentials")]
    InvalidCredentials,
    #[error("auth.provider_unavailable")]
    ProviderUnavailable,
}
