use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variables that must all be set before the Firebase client
/// can be initialized, in the order they are reported when missing.
pub const REQUIRED_KEYS: [&str; 8] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_DATABASE_URL",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_STORAGE_BUCKET",
    "FIREBASE_MESSAGING_SENDER_ID",
    "FIREBASE_APP_ID",
    "FIREBASE_MEASUREMENT_ID",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("config.missing_firebase_keys: {}", .missing.join(", "))]
    MissingConfiguration { missing: Vec<String> },
}

/// Validated Firebase web-app configuration.
///
/// Every field is non-empty. Values can only be read, and the whole object is
/// handed by value to [`crate::client::FirebaseApp::initialize`].
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    api_key: String,
    auth_domain: String,
    #[serde(rename = "databaseURL")]
    database_url: String,
    project_id: String,
    storage_bucket: String,
    messaging_sender_id: String,
    app_id: String,
    measurement_id: String,
}

/// Loads the Firebase configuration from the process environment.
///
/// # Errors
/// Returns [`ConfigurationError::MissingConfiguration`] naming every required
/// variable that is unset or empty once normalized.
pub fn load_configuration() -> Result<FirebaseConfig, ConfigurationError> {
    FirebaseConfig::from_lookup(|key| std::env::var(key).ok())
}

/// Strips surrounding whitespace and quote characters left behind by
/// deployment tooling (`" 'abc' "` becomes `abc`).
///
/// Idempotent; a value made only of quotes and whitespace becomes empty.
pub fn normalize_value(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'')
}

/// Shows enough of a secret to tell two keys apart in logs.
pub fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if visible.len() == secret.len() {
        "***".to_string()
    } else {
        format!("{}***", visible)
    }
}

impl FirebaseConfig {
    /// Builds the configuration from an arbitrary variable source.
    ///
    /// `lookup` returns `None` for unset variables, which are treated as empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values: BTreeMap<&'static str, String> = BTreeMap::new();
        let mut missing = Vec::new();

        for key in REQUIRED_KEYS {
            let raw = lookup(key).unwrap_or_default();
            let value = normalize_value(&raw);
            if value.is_empty() {
                missing.push(key.to_string());
            } else {
                values.insert(key, value.to_string());
            }
        }

        if !missing.is_empty() {
            return Err(ConfigurationError::MissingConfiguration { missing });
        }

        let mut take = |key: &str| values.remove(key).unwrap_or_default();
        let config = Self {
            api_key: take("FIREBASE_API_KEY"),
            auth_domain: take("FIREBASE_AUTH_DOMAIN"),
            database_url: take("FIREBASE_DATABASE_URL"),
            project_id: take("FIREBASE_PROJECT_ID"),
            storage_bucket: take("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: take("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: take("FIREBASE_APP_ID"),
            measurement_id: take("FIREBASE_MEASUREMENT_ID"),
        };

        debug!(
            database_url = %config.database_url,
            api_key = %redact(&config.api_key),
            "Firebase configuration normalized"
        );
        info!(project_id = %config.project_id, "Firebase configuration is valid");

        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn auth_domain(&self) -> &str {
        &self.auth_domain
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn storage_bucket(&self) -> &str {
        &self.storage_bucket
    }

    pub fn messaging_sender_id(&self) -> &str {
        &self.messaging_sender_id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn measurement_id(&self) -> &str {
        &self.measurement_id
    }

    /// The configuration keyed by the Firebase web SDK field names.
    pub fn as_map(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("apiKey", self.api_key.as_str()),
            ("authDomain", self.auth_domain.as_str()),
            ("databaseURL", self.database_url.as_str()),
            ("projectId", self.project_id.as_str()),
            ("storageBucket", self.storage_bucket.as_str()),
            ("messagingSenderId", self.messaging_sender_id.as_str()),
            ("appId", self.app_id.as_str()),
            ("measurementId", self.measurement_id.as_str()),
        ])
    }
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &redact(&self.api_key))
            .field("auth_domain", &self.auth_domain)
            .field("database_url", &self.database_url)
            .field("project_id", &self.project_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("app_id", &self.app_id)
            .field("measurement_id", &self.measurement_id)
            .finish()
    }
}
