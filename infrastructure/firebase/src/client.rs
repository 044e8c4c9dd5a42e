use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::auth::FirebaseAuth;
use crate::config::{FirebaseConfig, redact};
use crate::database::Database;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("firebase.invalid_database_url")]
    InvalidDatabaseUrl(#[source] url::ParseError),
    #[error("firebase.unsupported_database_scheme: {0}")]
    UnsupportedScheme(String),
    #[error("firebase.http_client")]
    HttpClient(#[source] reqwest::Error),
}

struct Inner {
    client: Client,
    database_url: Url,
    identity_url: String,
    api_key: String,
    project_id: String,
    auth_domain: String,
}

/// Initialized Firebase application handle.
///
/// Clones share one HTTP client and one copy of the credentials. Built once at
/// startup and released with [`FirebaseApp::close`] on shutdown.
#[derive(Clone)]
pub struct FirebaseApp {
    inner: Arc<Inner>,
}

/// Non-secret facts about the initialized app, safe to show operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSummary {
    pub project_id: String,
    pub auth_domain: String,
    pub database_url: String,
    pub api_key: String,
}

impl FirebaseApp {
    /// Validates the configuration and builds the shared client handle.
    ///
    /// No request is sent to Firebase here; reachability is checked by the
    /// readiness probe.
    ///
    /// # Errors
    /// Returns [`InitializationError`] when the database URL is malformed or
    /// not `https`, or when the HTTP client cannot be built.
    pub fn initialize(config: FirebaseConfig) -> Result<Self, InitializationError> {
        let database_url = parse_database_url(config.database_url())?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(InitializationError::HttpClient)?;

        let app = Self {
            inner: Arc::new(Inner {
                client,
                database_url,
                identity_url: IDENTITY_TOOLKIT_URL.to_string(),
                api_key: config.api_key().to_string(),
                project_id: config.project_id().to_string(),
                auth_domain: config.auth_domain().to_string(),
            }),
        };

        info!(
            project_id = %app.inner.project_id,
            database_url = %app.inner.database_url,
            "Firebase initialized successfully"
        );

        Ok(app)
    }

    pub fn database(&self) -> Database {
        Database::new(self.inner.client.clone(), self.inner.database_url.clone())
    }

    pub fn auth(&self) -> FirebaseAuth {
        FirebaseAuth::new(
            self.inner.client.clone(),
            self.inner.identity_url.clone(),
            self.inner.api_key.clone(),
        )
    }

    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    pub fn summary(&self) -> AppSummary {
        AppSummary {
            project_id: self.inner.project_id.clone(),
            auth_domain: self.inner.auth_domain.clone(),
            database_url: self.inner.database_url.to_string(),
            api_key: redact(&self.inner.api_key),
        }
    }

    /// Releases this handle. The underlying client is freed once every clone
    /// held by request handlers has been dropped as well.
    pub fn close(self) {
        let outstanding = Arc::strong_count(&self.inner) - 1;
        info!(
            project_id = %self.inner.project_id,
            outstanding,
            "Firebase client released"
        );
    }
}

fn parse_database_url(raw: &str) -> Result<Url, InitializationError> {
    let url = Url::parse(raw).map_err(InitializationError::InvalidDatabaseUrl)?;

    let local_emulator = matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"));
    match url.scheme() {
        "https" => Ok(url),
        "http" if local_emulator => Ok(url),
        other => Err(InitializationError::UnsupportedScheme(other.to_string())),
    }
}
