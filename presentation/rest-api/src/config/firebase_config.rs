use anyhow::Context;
use firebase::{FirebaseApp, load_configuration};

/// Load the Firebase configuration and initialize the shared client
///
/// Environment variables (all required, surrounding quotes are ignored):
/// - FIREBASE_API_KEY, FIREBASE_AUTH_DOMAIN, FIREBASE_DATABASE_URL,
///   FIREBASE_PROJECT_ID, FIREBASE_STORAGE_BUCKET,
///   FIREBASE_MESSAGING_SENDER_ID, FIREBASE_APP_ID, FIREBASE_MEASUREMENT_ID
///
/// # Errors
/// Returns error if any variable is missing or the client rejects the
/// configuration. Startup must stop on either.
pub fn init_firebase() -> anyhow::Result<FirebaseApp> {
    let config = load_configuration().context("loading Firebase configuration")?;
    let app = FirebaseApp::initialize(config).context("initializing Firebase client")?;
    Ok(app)
}
